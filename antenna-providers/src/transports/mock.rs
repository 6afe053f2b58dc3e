use crate::{provider::ProviderError, JsonRpcClient};

use super::common::JsonRpcError;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    borrow::Borrow,
    collections::VecDeque,
    fmt::Debug,
    sync::{Arc, Mutex},
};
use thiserror::Error;

/// Helper type that can be used to pass through the `params` value.
/// This is necessary because the wrapper provider is supposed to skip the
/// `params` if it's of size 0, see `crate::transports::common::Request`
#[derive(Debug)]
enum MockParams {
    Value(Value),
    Zst,
}

/// Scripted response for [`MockClient`]: a JSON value for success, a
/// [`JsonRpcError`] for gateway-side failures.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Successful response
    Value(Value),

    /// Error response
    Error(JsonRpcError),
}

/// Mock transport used in test environments.
///
/// Responses are served in the order they were pushed; every request is
/// recorded so tests can assert exactly which calls a flow produced (and
/// which it never made).
#[derive(Clone, Debug)]
pub struct MockClient {
    requests: Arc<Mutex<VecDeque<(String, MockParams)>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonRpcClient for MockClient {
    type Error = MockError;

    /// Records `(method, params)` and pops the next scripted response
    async fn request<T: Debug + Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, MockError> {
        let params = if std::mem::size_of::<T>() == 0 {
            MockParams::Zst
        } else {
            MockParams::Value(serde_json::to_value(params)?)
        };
        self.requests.lock().unwrap().push_back((method.to_owned(), params));

        let element =
            self.responses.lock().unwrap().pop_front().ok_or(MockError::EmptyResponses)?;
        match element {
            MockResponse::Value(value) => Ok(serde_json::from_value(value)?),
            MockResponse::Error(error) => Err(MockError::JsonRpcError(error)),
        }
    }
}

impl MockClient {
    /// Instantiates a mock transport
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(VecDeque::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Pushes data onto the scripted response queue
    pub fn push<T: Serialize + Send + Sync, K: Borrow<T>>(&self, data: K) -> Result<(), MockError> {
        let value = serde_json::to_value(data.borrow())?;
        self.responses.lock().unwrap().push_back(MockResponse::Value(value));
        Ok(())
    }

    /// Pushes a response or a gateway error onto the scripted queue
    pub fn push_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Pops the oldest recorded request and checks it against the expected
    /// method and params
    pub fn assert_request<T: Serialize + Send + Sync>(
        &self,
        method: &str,
        data: T,
    ) -> Result<(), MockError> {
        let (m, inp) = self.requests.lock().unwrap().pop_front().ok_or(MockError::EmptyRequests)?;
        assert_eq!(m, method);
        assert!(!matches!(inp, MockParams::Value(Value::Null)));
        if std::mem::size_of::<T>() == 0 {
            assert!(matches!(inp, MockParams::Zst));
        } else if let MockParams::Value(inp) = inp {
            assert_eq!(serde_json::to_value(data).expect("could not serialize data"), inp);
        } else {
            unreachable!("zero sized types must be denoted with MockParams::Zst")
        }

        Ok(())
    }

    /// Number of recorded requests not yet consumed by
    /// [`MockClient::assert_request`]
    pub fn pending_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Errors for the [`MockClient`]
#[derive(Error, Debug)]
pub enum MockError {
    /// (De)Serialization error
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// No request had been recorded
    #[error("empty requests queue, the flow under test made no call")]
    EmptyRequests,

    /// The scripted responses ran out
    #[error("empty responses queue, please push some responses")]
    EmptyResponses,

    /// Scripted gateway error
    #[error("JSON-RPC error: {0}")]
    JsonRpcError(JsonRpcError),
}

impl From<MockError> for ProviderError {
    fn from(src: MockError) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}
