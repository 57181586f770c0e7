use std::sync::Arc;

use omdb::OmdbClient;
use reqwest::Client;

use crate::config::Config;
use crate::services::{JsonStorage, MetadataProvider, OmdbProvider, PdfExporter, SeriesStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<UserStore>,
    pub series: Arc<SeriesStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub exporter: Arc<PdfExporter>,
}

impl AppState {
    /// Build the state backed by OMDb. The HTTP client is shared by the
    /// metadata provider and the cover downloads of the PDF export.
    pub async fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.omdb_timeout).build()?;

        let omdb = OmdbClient::with_client(http.clone(), config.omdb_api_key.as_str());
        if !omdb.has_api_key() {
            tracing::warn!("OMDB_API_KEY is not set, adding and searching series will fail");
        }
        let metadata = Arc::new(OmdbProvider::new(
            Arc::new(omdb),
            config.episodes_per_season,
        ));

        Ok(Self::with_metadata(config, metadata, http).await)
    }

    /// Build the state around any metadata provider.
    pub async fn with_metadata(
        config: Config,
        metadata: Arc<dyn MetadataProvider>,
        http: Client,
    ) -> Self {
        let storage = Arc::new(JsonStorage::new(&config.data_path));
        let users = Arc::new(UserStore::load(Arc::clone(&storage)).await);
        let series = Arc::new(SeriesStore::new(storage));

        Self {
            config: Arc::new(config),
            users,
            series,
            metadata,
            exporter: Arc::new(PdfExporter::new(http)),
        }
    }
}
