//! Async HTTP client for the medstock API.
//!
//! Mutations send form-encoded bodies exactly like a browser form would, so prices travel as
//! text and are validated by the server.

use crate::error::{ClientError, ClientResult};
use api_shared::{
    AveragePriceRes, CreateMedicineReq, DeleteMedicineReq, ErrorRes, ListMedicinesRes, Medicine,
    MessageRes, UpdateMedicineReq,
};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct MedicineClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MedicineClient {
    /// Creates a client for the API rooted at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list(&self) -> ClientResult<Vec<Medicine>> {
        let resp = self
            .http
            .get(self.url(&["medicines"])?)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: ListMedicinesRes = decode(resp).await?;
        Ok(body.medicines)
    }

    pub async fn average_price(&self) -> ClientResult<AveragePriceRes> {
        let resp = self
            .http
            .get(self.url(&["medicines", "average-price"])?)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(resp).await
    }

    pub async fn get(&self, name: &str) -> ClientResult<Medicine> {
        let resp = self
            .http
            .get(self.url(&["medicines", name])?)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(resp).await
    }

    /// Creates a medicine. Returns the server's confirmation message.
    pub async fn create(&self, name: &str, price: &str) -> ClientResult<String> {
        let form = CreateMedicineReq {
            name: Some(name.to_owned()),
            price: Some(price.to_owned()),
        };
        let resp = self
            .http
            .post(self.url(&["create"])?)
            .form(&form)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: MessageRes = decode(resp).await?;
        Ok(body.message)
    }

    /// Updates the price and/or name of `name`. Returns the server's confirmation message.
    pub async fn update(
        &self,
        name: &str,
        price: Option<&str>,
        new_name: Option<&str>,
    ) -> ClientResult<String> {
        let form = UpdateMedicineReq {
            name: Some(name.to_owned()),
            price: price.map(str::to_owned),
            new_name: new_name.map(str::to_owned),
        };
        let resp = self
            .http
            .post(self.url(&["update"])?)
            .form(&form)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: MessageRes = decode(resp).await?;
        Ok(body.message)
    }

    /// Deletes `name`. Returns the server's confirmation message.
    pub async fn delete(&self, name: &str) -> ClientResult<String> {
        let form = DeleteMedicineReq {
            name: Some(name.to_owned()),
        };
        let resp = self
            .http
            .delete(self.url(&["delete"])?)
            .form(&form)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: MessageRes = decode(resp).await?;
        Ok(body.message)
    }

    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Decodes a success body, or turns an error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().await.map_err(ClientError::Decode);
    }

    let message = match resp.json::<ErrorRes>().await {
        Ok(body) => body.error,
        Err(e) => {
            tracing::debug!("error response without an error body: {}", e);
            format!("Request failed with status {}", status.as_u16())
        }
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
