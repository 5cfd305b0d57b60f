use failure::Fail;

#[derive(Debug, Fail)]
pub enum SgdError {
    #[fail(display = "Invalid argument: {}", _0)]
    InvalidArgument(String),
    #[fail(
        display = "Dialogue '{}' has a turn with {} frames, exactly one expected",
        dialogue_id, n_frames
    )]
    InvalidFrame {
        dialogue_id: String,
        n_frames: usize,
    },
    #[fail(display = "Corpus inconsistency: {}", _0)]
    CorpusInconsistency(String),
    #[fail(display = "Missing or corrupt metadata file '{}'", _0)]
    MissingOrCorruptMetadata(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
