use crate::models::SearchResponse;
use crate::OmdbClient;

impl OmdbClient {
    /// Search series by free text. Only the first result page is requested.
    ///
    /// OMDb occasionally mixes other types into the results, so callers
    /// should still filter with [`crate::SearchHit::is_series`].
    pub async fn search(&self, query: &str) -> crate::Result<SearchResponse> {
        let query = query.trim();
        tracing::debug!("OMDb search: {}", query);
        self.get(&[("s", query), ("type", "series"), ("page", "1")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{OmdbClient, OmdbError};
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_returns_hits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("s", "dark"))
            .and(query_param("type", "series"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Search": [
                    {"Title": "Dark", "Year": "2017–2020", "imdbID": "tt5753856", "Type": "series", "Poster": "N/A"},
                    {"Title": "Dark Matter", "Year": "2015–2017", "imdbID": "tt4159076", "Type": "series", "Poster": "N/A"}
                ],
                "totalResults": "2",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OmdbClient::with_client(Client::new(), "key").with_base_url(server.uri());
        let response = client.search(" dark ").await.unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].imdb_id, "tt5753856");
        assert_eq!(response.total_results.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Too many results."
            })))
            .mount(&server)
            .await;

        let client = OmdbClient::with_client(Client::new(), "key").with_base_url(server.uri());
        match client.search("a").await {
            Err(OmdbError::Api(msg)) => assert_eq!(msg, "Too many results."),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
