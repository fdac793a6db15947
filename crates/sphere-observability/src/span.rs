//! Request spans.

use sphere_core::FetchRequest;
use tracing::Span;

/// Span for handling one intercepted fetch.
///
/// Events logged inside it carry the request ID, method, URL and destination.
pub fn request_span(request: &FetchRequest) -> Span {
    tracing::info_span!(
        "fetch",
        request_id = %request.request_id,
        method = %request.method,
        url = %request.url(),
        destination = request.destination.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_core::Destination;

    #[test]
    fn test_span_without_subscriber_is_usable() {
        let request = FetchRequest::get("https://wallsphere.example/uploads/a.jpg")
            .unwrap()
            .with_destination(Destination::Image);

        let span = request_span(&request);
        let _guard = span.enter();
        tracing::debug!("inside request span");
    }
}
