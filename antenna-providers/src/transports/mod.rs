mod common;
pub use common::{JsonRpcError, Request, Response, ResponseData};

mod http;
pub use http::{ClientError as HttpClientError, Provider as Http};

mod mock;
pub use mock::{MockClient, MockError, MockResponse};
