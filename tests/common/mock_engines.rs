/*!
 * Mock engine implementations for testing.
 *
 * This module provides mock engines that simulate different behaviors:
 * - `MockEngine::working()` - Always succeeds with a fixed transcript
 * - `MockEngine::failing()` - Always fails with an error
 * - `MockEngine::empty()` - Returns a transcript with no segments
 * - `MockEngine::misordered()` - Returns a segment ending before it starts
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use subsync::engines::Engine;
use subsync::errors::EngineError;
use subsync::subtitle_processor::Segment;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Audio path the engine would have read
    pub audio: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Segments the engine "recognized"
    pub segments: Vec<Segment>,
}

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a fixed transcript
    Working,
    /// Always fails with an error
    Failing,
    /// Returns no segments
    Empty,
    /// Returns a segment whose end precedes its start
    Misordered,
}

/// Mock engine for testing transcription behavior
#[derive(Debug)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine that recognizes nothing
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock engine that emits a misordered segment
    pub fn misordered() -> Self {
        Self::new(MockBehavior::Misordered)
    }

    /// Number of transcribe calls made against this engine
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockEngine {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Engine for MockEngine {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn transcribe(&self, request: Self::Request) -> Result<Self::Response, EngineError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                segments: vec![
                    Segment::new(0.0, 1.5, "Hi"),
                    Segment::new(1.5, 3.0, "There"),
                ],
            }),

            MockBehavior::Failing => Err(EngineError::ExecutionFailed {
                status: 1,
                stderr: format!("simulated engine failure reading {}", request.audio),
            }),

            MockBehavior::Empty => Ok(MockResponse { segments: Vec::new() }),

            MockBehavior::Misordered => Ok(MockResponse {
                segments: vec![Segment::new(2.0, 1.0, "Backwards")],
            }),
        }
    }

    async fn check_availability(&self) -> Result<(), EngineError> {
        match self.behavior {
            MockBehavior::Failing => Err(EngineError::BinaryNotFound("mock".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_segments(response: &Self::Response) -> Result<Vec<Segment>, EngineError> {
        Ok(response.segments.clone())
    }
}
