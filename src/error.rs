use thiserror::Error;

pub type MountResult<T> = Result<T, MountError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    #[error("invalid size: width={width}, height={height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("widget construction failed for `{chart_id}`: {reason}")]
    WidgetConstruction { chart_id: String, reason: String },

    #[error("chart type `{0}` is already registered")]
    DuplicateChartType(String),

    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}
