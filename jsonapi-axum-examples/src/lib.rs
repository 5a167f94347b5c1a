//! A small in-memory "articles" service built on `jsonapi-axum`.
//!
//! ```text
//! GET  /articles?page[number]=1&page[size]=2&sort=-id&filter[tag]=rust
//! GET  /articles/lookup?ids=1,3
//! POST /articles            {"title": "...", "tags": ["..."]}
//! GET  /debug/panic
//! ```

use std::cmp::Ordering;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    routing::get,
};
use jsonapi_axum::prelude::*;
use jsonapi_axum::{Direction, parse_ids};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub tags: Vec<String>,
    pub published: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewArticle {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Clone, Default)]
pub struct AppState {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl AppState {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(RwLock::new(articles)),
        }
    }
}

/// Returns the server address from PORT env var, defaulting to 3000.
pub fn server_addr() -> SocketAddr {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    SocketAddr::from(([0, 0, 0, 0], port))
}

/// Build the service router with the standard fallbacks and layers installed.
pub fn app(state: AppState, config: ApiConfig) -> Router {
    let router = Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/lookup", get(lookup_articles))
        .route("/debug/panic", get(panic_route))
        .with_state(state);
    jsonapi_axum::with_defaults(router, config)
}

async fn list_articles(
    State(state): State<AppState>,
    start: RequestStart,
    uri: Uri,
    ApiQuery(req): ApiQuery,
) -> Result<ApiResponse<Vec<Article>>, ApiError> {
    let ids = req.filter_ids("id")?;
    let articles = state.articles.read().await;

    let mut matched: Vec<Article> = articles
        .iter()
        .filter(|a| ids.is_empty() || ids.contains(&a.id))
        .filter(|a| {
            let tags = req.filter_values("tag");
            tags.is_empty() || tags.iter().any(|t| a.tags.contains(t))
        })
        .filter(|a| !req.filter.contains_key("author") || a.author_id == req.filter_int("author"))
        .filter(|a| !req.filter.contains_key("published") || a.published == req.filter_bool("published"))
        .cloned()
        .collect();

    for key in req.sort_keys().collect::<Vec<_>>().into_iter().rev() {
        let compare: fn(&Article, &Article) -> Ordering = match key.field {
            "id" => by_id,
            "title" => by_title,
            _ => continue,
        };
        match key.direction {
            Direction::Ascending => matched.sort_by(compare),
            Direction::Descending => matched.sort_by(|a, b| compare(b, a)),
        }
    }

    let total = matched.len() as i64;
    let base = uri.path_and_query().map_or("/articles", |pq| pq.as_str());
    let page: Vec<Article> = matched
        .into_iter()
        .skip(usize::try_from(req.page_offset).unwrap_or(usize::MAX))
        .take(usize::try_from(req.page_limit).unwrap_or(usize::MAX))
        .collect();

    Ok(Envelope::new()
        .with_data(page)
        .with_links(Links::paginate(base, &req, total))
        .with_meta(Meta::new(total).with_process_time(start.elapsed()))
        .with_callback(req.callback)
        .into())
}

fn by_id(a: &Article, b: &Article) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_title(a: &Article, b: &Article) -> Ordering {
    a.title.cmp(&b.title)
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    #[serde(default)]
    ids: String,
}

async fn lookup_articles(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<ApiResponse<Vec<Article>>, ApiError> {
    let ids = parse_ids(&params.ids)?;
    let articles = state.articles.read().await;
    let found: Vec<Article> = ids
        .iter()
        .filter_map(|id| articles.iter().find(|a| a.id == *id).cloned())
        .collect();

    if found.is_empty() {
        return Err(ApiError::not_found());
    }
    Ok(Envelope::new()
        .with_meta(Meta::new(found.len() as i64))
        .with_data(found)
        .into())
}

async fn create_article(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery,
    JsonBody(new): JsonBody<NewArticle>,
) -> Result<ApiResponse<Article>, ApiError> {
    if new.title.trim().is_empty() {
        return Err(ApiError::with_detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "title must not be empty",
        ));
    }

    let mut articles = state.articles.write().await;
    let article = Article {
        id: articles.iter().map(|a| a.id).max().unwrap_or(0) + 1,
        title: new.title,
        author_id: req.user_id,
        tags: new.tags,
        published: new.published,
    };
    articles.push(article.clone());
    tracing::info!(id = article.id, author_id = article.author_id, "article created");

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        Envelope::new()
            .with_meta(Meta::new(1))
            .with_data(article),
    ))
}

async fn panic_route() -> &'static str {
    panic!("panic requested via /debug/panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, http::header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn article(id: i64, title: &str, author_id: i64, tags: &[&str], published: bool) -> Article {
        Article {
            id,
            title: title.into(),
            author_id,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published,
        }
    }

    fn seeded() -> AppState {
        AppState::with_articles(vec![
            article(1, "Borrowing", 10, &["rust"], true),
            article(2, "Async traits", 10, &["rust", "async"], false),
            article(3, "Go channels", 20, &["go"], true),
            article(4, "Axum extractors", 20, &["rust", "web"], true),
        ])
    }

    fn router() -> Router {
        app(seeded(), ApiConfig::new().pagination(PaginationConfig::new().default_page_size(10)))
    }

    async fn send(router: Router, req: Request) -> (StatusCode, String) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(router(), req).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    fn ids(json: &serde_json::Value) -> Vec<i64> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_pagination_and_links() {
        let (status, json) = get_json("/articles?page[number]=2&page[size]=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&json), vec![4]);
        assert_eq!(json["meta"]["total_data"], 4);
        assert!(json["meta"]["process_time"].as_f64().unwrap() >= 0.0);
        assert_eq!(json["links"]["prev"], "/articles?page[number]=1&page[size]=3");
        assert!(json["links"].get("next").is_none());
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_links_keep_filters_and_sort() {
        let (_, json) = get_json("/articles?filter[tag]=rust&sort=-id&page[size]=1").await;
        assert_eq!(ids(&json), vec![4]);
        assert_eq!(json["meta"]["total_data"], 3);
        assert_eq!(
            json["links"]["next"],
            "/articles?filter[tag]=rust&sort=-id&page[number]=2&page[size]=1"
        );

        let next = json["links"]["next"].as_str().unwrap().to_string();
        let (_, json) = get_json(&next).await;
        assert_eq!(ids(&json), vec![2]);
        assert_eq!(json["meta"]["total_data"], 3);

        let next = json["links"]["next"].as_str().unwrap().to_string();
        let (_, json) = get_json(&next).await;
        assert_eq!(ids(&json), vec![1]);
        assert!(json["links"].get("next").is_none());
        assert_eq!(
            json["links"]["first"],
            "/articles?filter[tag]=rust&sort=-id&page[number]=1&page[size]=1"
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_sort() {
        let (_, json) = get_json("/articles?filter[tag]=rust&sort=-id").await;
        assert_eq!(ids(&json), vec![4, 2, 1]);

        let (_, json) = get_json("/articles?filter[author]=20&filter[published]=1&sort=title").await;
        assert_eq!(ids(&json), vec![4, 3]);

        let (_, json) = get_json("/articles?filter[published]=0").await;
        assert_eq!(ids(&json), vec![2]);

        let (_, json) = get_json("/articles?filter[id]=3,1").await;
        assert_eq!(ids(&json), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_list_invalid_id_filter() {
        let (status, json) = get_json("/articles?filter[id]=1,x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "HTTP400");
    }

    #[tokio::test]
    async fn test_list_jsonp() {
        let req = Request::builder()
            .uri("/articles?callback=feed.render&filter[id]=1")
            .body(Body::empty())
            .unwrap();
        let resp = router().oneshot(req).await.unwrap();
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/javascript");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.starts_with("feed.render({"));
        assert!(body.ends_with("})"));
    }

    #[tokio::test]
    async fn test_lookup() {
        let (status, json) = get_json("/articles/lookup?ids=3,3,1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&json), vec![3, 1]);

        let (status, _) = get_json("/articles/lookup?ids=99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json("/articles/lookup?ids=a").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create() {
        let req = Request::builder()
            .method("POST")
            .uri("/articles")
            .header("x-user-id", "42")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"Tower layers","tags":["rust"]}"#))
            .unwrap();
        let (status, body) = send(router(), req).await;
        assert_eq!(status, StatusCode::CREATED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["id"], 5);
        assert_eq!(json["data"]["author_id"], 42);
        assert_eq!(json["data"]["published"], false);
    }

    #[tokio::test]
    async fn test_create_empty_title() {
        let req = Request::builder()
            .method("POST")
            .uri("/articles")
            .body(Body::from(r#"{"title":"  "}"#))
            .unwrap();
        let (status, body) = send(router(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["errors"][0]["detail"], "title must not be empty");
    }

    #[tokio::test]
    async fn test_fallbacks() {
        let (status, json) = get_json("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["errors"][0]["code"], "HTTP404");

        let req = Request::builder()
            .method("DELETE")
            .uri("/articles")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(router(), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, json) = get_json("/debug/panic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["errors"][0]["detail"], "Internal Server Error");
    }
}
