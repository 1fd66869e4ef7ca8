//! Pagination envelope helpers for list endpoints.

use actix_web::HttpRequest;
use pagination::{Page, PageRequest, Paginated};
use url::Url;

use crate::domain::Error;

/// Absolute URL of the current request, used as the base for page links.
pub(crate) fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("invalid request url {raw}: {err}")))
}

/// Wrap `page` in the `{count, next, previous, results}` envelope, converting
/// each item to its wire shape.
pub(crate) fn paginated<T, U>(
    req: &HttpRequest,
    page: Page<T>,
    request: PageRequest,
) -> Result<Paginated<U>, Error>
where
    U: From<T>,
{
    let base = request_url(req)?;
    Ok(Paginated::from_page(page.map(U::from), request, &base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn request_url_includes_host_and_query() {
        let req = TestRequest::get()
            .uri("/api/users?page=2")
            .insert_header(("host", "food.example"))
            .to_http_request();
        let url = request_url(&req).expect("url builds");
        assert_eq!(url.as_str(), "http://food.example/api/users?page=2");
    }

    #[rstest]
    fn envelope_links_follow_request() {
        let req = TestRequest::get()
            .uri("/api/users?limit=1")
            .insert_header(("host", "food.example"))
            .to_http_request();
        let request = PageRequest::new(1, 1).expect("valid request");
        let envelope: Paginated<String> =
            paginated(&req, Page::new(vec!["a"], 2), request).expect("envelope");
        assert_eq!(envelope.count, 2);
        assert_eq!(
            envelope.next.as_deref(),
            Some("http://food.example/api/users?page=2&limit=1")
        );
        assert!(envelope.previous.is_none());
        assert_eq!(envelope.results, vec!["a".to_owned()]);
    }
}
