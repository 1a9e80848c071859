use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use crate::{
    models::source::SourceConfig,
    sampling::{OccupancyReader, SourceError},
};

/// A scripted occupancy reader.
///
/// Each `read` pops the next scripted response for the source; an exhausted
/// or unknown source reports end of stream, mirroring a capture stream
/// running out of frames.
#[derive(Default)]
pub struct FakeReader {
    responses: Mutex<HashMap<String, VecDeque<Result<u32, SourceError>>>>,
}

impl FakeReader {
    /// Creates a reader with no scripted sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the responses for one source id, in read order.
    pub fn source(
        self,
        id: &str,
        responses: impl IntoIterator<Item = Result<u32, SourceError>>,
    ) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(id.to_string(), responses.into_iter().collect());
        self
    }
}

#[async_trait::async_trait]
impl OccupancyReader for FakeReader {
    async fn read(&self, source: &SourceConfig) -> Result<u32, SourceError> {
        self.responses
            .lock()
            .unwrap()
            .get_mut(&source.id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Err(SourceError::EndOfStream))
    }
}
