use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("Invalid plot configuration: {0}")]
    InvalidConfig(String),
    #[error("Degenerate scale: domain {domain:?} onto codomain {codomain:?}")]
    DegenerateScale {
        domain: (f64, f64),
        codomain: (f64, f64),
    },
}
