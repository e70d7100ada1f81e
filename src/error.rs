use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum SrsError {
    #[snafu(display("quality {value} is outside 0..=5"))]
    InvalidQuality { value: i32 },
    #[snafu(display("record for {item_id:?} is invalid: {reason}"))]
    InvalidRecord { item_id: String, reason: String },
    #[snafu(display("could not (de)serialize progress: {source}"))]
    Serialization { source: serde_json::Error },
}

pub type Result<T, E = SrsError> = std::result::Result<T, E>;
