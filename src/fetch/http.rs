use super::{ByteStream, Source};
use crate::error::{FetchError, Result};
use crate::utils::http::build_client;
use futures::stream::StreamExt;
use std::time::Duration;

/// Plain HTTP(S) GET through a shared reqwest client.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
        })
    }
}

impl Source for HttpSource {
    async fn open(&self, url: &str) -> std::result::Result<ByteStream, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(FetchError::from))
            .boxed())
    }
}
