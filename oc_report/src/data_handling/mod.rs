pub mod trajectories;
