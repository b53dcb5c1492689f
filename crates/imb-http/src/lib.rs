//! reqwest adapter for the `HttpTransport` port.
//!
//! No idle connections are pooled: every call opens its own connection and
//! releases it when the response is consumed or dropped.

use async_trait::async_trait;

use imb_core::{
    errors::Error,
    ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError},
    Result,
};

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("imb/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self { http })
    }

    fn build(&self, req: HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = match req.method {
            HttpMethod::Get => self.http.get(&req.url),
            HttpMethod::Post => self.http.post(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &req.json {
            builder = builder.json(body);
        }
        builder
    }
}

fn map_err(e: reqwest::Error) -> TransportError {
    if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        req: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let method = req.method;
        let url = req.url.clone();

        let resp = self.build(req).send().await.map_err(map_err)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(map_err)?;

        tracing::debug!(?method, %url, status, "provider response");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_post_with_headers_and_json() {
        let t = ReqwestTransport::new().unwrap();
        let req = HttpRequest::post_json(
            "https://imei.test/v1/checks",
            serde_json::json!({"deviceId": "490154203237518", "serviceId": 1}),
        )
        .bearer_json("k");

        let built = t.build(req).build().unwrap();
        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.url().as_str(), "https://imei.test/v1/checks");
        assert_eq!(built.headers()["authorization"], "Bearer k");
        assert_eq!(built.headers()["content-type"], "application/json");

        let body = built.body().and_then(|b| b.as_bytes()).unwrap();
        let v: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(v["deviceId"], "490154203237518");
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connect() {
        let t = ReqwestTransport::new().unwrap();
        // Port 9 (discard) on loopback is closed on test machines.
        let err = t
            .execute(HttpRequest::get("http://127.0.0.1:9/v1/account"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
    }
}
