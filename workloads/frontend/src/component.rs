//! Spin HTTP component.

use anyhow::anyhow;
use spin_sdk::http::{Fields, IncomingRequest, Method, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

use concinnity_sdk::prelude::*;

use crate::host::FrontendHost;

/// Frontend page handler.
#[http_component]
async fn handle_frontend(req: IncomingRequest, response_out: ResponseOutparam) {
    if let Err(e) = serve(req, response_out).await {
        eprintln!("concinnity-frontend: {:#}", e);
    }
}

async fn serve(req: IncomingRequest, response_out: ResponseOutparam) -> anyhow::Result<()> {
    let request = to_render_request(&req)?;
    let request_id = request.request_id.clone();
    let head_only = request.method == http::Method::HEAD;

    let host = FrontendHost::from_embedded_config()?;
    let response = host.respond(request).await?;

    let header_list: Vec<(String, Vec<u8>)> = response
        .headers(&request_id)
        .into_iter()
        .map(|(name, value)| (name, value.into_bytes()))
        .collect();
    let headers = Fields::from_list(&header_list)
        .map_err(|e| anyhow!("invalid response headers: {:?}", e))?;
    let outgoing = OutgoingResponse::new(headers);
    outgoing
        .set_status_code(response.status)
        .map_err(|_| anyhow!("invalid status code {}", response.status))?;

    let body = outgoing.take_body();
    response_out.set(outgoing);

    if let Some(document) = response.document().filter(|_| !head_only) {
        let mut sink = DocumentSink::new(body);
        sink.send_document(document).await?;
    }

    Ok(())
}

fn to_render_request(req: &IncomingRequest) -> anyhow::Result<RenderRequest> {
    let method = match req.method() {
        Method::Get => http::Method::GET,
        Method::Head => http::Method::HEAD,
        Method::Post => http::Method::POST,
        Method::Put => http::Method::PUT,
        Method::Delete => http::Method::DELETE,
        Method::Patch => http::Method::PATCH,
        Method::Options => http::Method::OPTIONS,
        Method::Connect => http::Method::CONNECT,
        Method::Trace => http::Method::TRACE,
        Method::Other(name) => http::Method::from_bytes(name.as_bytes())?,
    };

    let path = req.path_with_query().unwrap_or_else(|| "/".to_string());
    let mut request = RenderRequest::from_path_with_query(method, &path);
    for (name, value) in req.headers().entries() {
        request = request.with_header(name, String::from_utf8_lossy(&value).into_owned());
    }

    Ok(request)
}
