use std::fmt::Write as _;

use faultline_core::SimpleFault;
use faultline_handler::{HandlerInfo, Outcome, RequestInfo, RestExceptionHandler};
use http::header::{ACCEPT, HeaderValue};
use http::{HeaderMap, Method, StatusCode, Uri};

use crate::args::RenderArgs;

/// Run a synthetic fault through the handler and describe the response
///
/// # Errors
///
/// Returns an error if the arguments do not form a valid request or the
/// fault is left unhandled
pub fn render(handler: &RestExceptionHandler, args: &RenderArgs) -> anyhow::Result<String> {
    let mut fault = SimpleFault::new(args.kind.clone(), args.message.clone());
    if let Some(status) = args.status {
        let status =
            StatusCode::from_u16(status).map_err(|e| anyhow::anyhow!("invalid fault status {status}: {e}"))?;
        fault = fault.with_status(status);
    }

    let mut headers = HeaderMap::new();
    if let Some(ref accept) = args.accept {
        let value = HeaderValue::from_str(accept).map_err(|e| anyhow::anyhow!("invalid Accept header: {e}"))?;
        headers.insert(ACCEPT, value);
    }

    let uri: Uri = args
        .uri
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid request uri '{}': {e}", args.uri))?;

    let mut request = RequestInfo::new(Method::GET, uri, headers);
    if args.include {
        request = request.into_include();
    }

    let route = args.handler.clone().map(HandlerInfo::new);

    let Outcome::Handled(rendered) = handler.handle(&request, route.as_ref(), &fault) else {
        anyhow::bail!("fault of kind '{}' was not handled", args.kind);
    };

    let mut out = String::new();
    match rendered.status() {
        Some(status) => writeln!(out, "{status}")?,
        None => writeln!(out, "(status unchanged)")?,
    }
    for (name, value) in rendered.headers() {
        writeln!(out, "{name}: {}", value.to_str().unwrap_or("<binary>"))?;
    }
    writeln!(out)?;
    out.push_str(&String::from_utf8_lossy(rendered.body()));

    Ok(out)
}
