pub mod classification;
pub mod report;
pub mod sampling;
pub mod trajectory_plot;
pub mod type_i_error;
