//! Request classification.

use http::Method;
use sphere_cache::BucketKind;
use sphere_core::{Destination, FetchRequest, WorkerConfig};

/// Strategy selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Serve from the bucket when present, else from the network.
    CacheFirst(BucketKind),
    /// Serve from the network, fall back to the API bucket.
    NetworkFirst,
    /// Leave the request to the host.
    Passthrough,
}

/// Pick the strategy for a request.
///
/// Static assets win over images, images over API routes. Only GET is cached.
pub fn classify(config: &WorkerConfig, request: &FetchRequest) -> Route {
    if request.method != Method::GET {
        return Route::Passthrough;
    }

    let path = request.path();

    if config.is_static_asset(path) {
        return Route::CacheFirst(BucketKind::Static);
    }

    if request.destination == Destination::Image || config.routes.is_image_path(path) {
        return Route::CacheFirst(BucketKind::Image);
    }

    if config.routes.is_api_path(path) {
        return Route::NetworkFirst;
    }

    Route::Passthrough
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkerConfig {
        WorkerConfig::new("https://wallsphere.example")
    }

    fn get(path: &str) -> FetchRequest {
        FetchRequest::get(&format!("https://wallsphere.example{}", path)).unwrap()
    }

    #[test]
    fn test_static_assets_are_cache_first() {
        assert_eq!(
            classify(&config(), &get("/static/style.css")),
            Route::CacheFirst(BucketKind::Static)
        );
        assert_eq!(classify(&config(), &get("/")), Route::CacheFirst(BucketKind::Static));
    }

    #[test]
    fn test_static_match_ignores_query() {
        assert_eq!(
            classify(&config(), &get("/static/style.css?v=3")),
            Route::CacheFirst(BucketKind::Static)
        );
    }

    #[test]
    fn test_images_by_destination_prefix_or_extension() {
        let by_destination = get("/view/wallpapers/7/sunset").with_destination(Destination::Image);
        assert_eq!(
            classify(&config(), &by_destination),
            Route::CacheFirst(BucketKind::Image)
        );
        assert_eq!(
            classify(&config(), &get("/uploads/abc_medium")),
            Route::CacheFirst(BucketKind::Image)
        );
        assert_eq!(
            classify(&config(), &get("/static/avatars/cartoon4.jpg")),
            Route::CacheFirst(BucketKind::Image)
        );
        assert_eq!(
            classify(&config(), &get("/media/banner.png")),
            Route::CacheFirst(BucketKind::Image)
        );
    }

    #[test]
    fn test_api_routes_are_network_first() {
        assert_eq!(classify(&config(), &get("/api/assets/wallpapers")), Route::NetworkFirst);
        assert_eq!(classify(&config(), &get("/api/search?q=forest")), Route::NetworkFirst);
    }

    #[test]
    fn test_other_pages_pass_through() {
        assert_eq!(classify(&config(), &get("/view/wallpapers/7/sunset")), Route::Passthrough);
        assert_eq!(classify(&config(), &get("/search")), Route::Passthrough);
    }

    #[test]
    fn test_non_get_passes_through() {
        let post = get("/api/like").with_method(Method::POST);
        assert_eq!(classify(&config(), &post), Route::Passthrough);
    }
}
