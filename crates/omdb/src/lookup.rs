use crate::models::Title;
use crate::OmdbClient;

/// IMDb ids start with this prefix, e.g. `tt0944947`.
const ID_PREFIX: &str = "tt";

/// Title used by [`OmdbClient::health_check`].
const HEALTH_CHECK_TITLE: &str = "Game of Thrones";

/// How an identifier is sent to OMDb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    /// Direct IMDb id lookup (`i=`)
    Id(&'a str),
    /// Free-text title lookup restricted to series (`t=`, `type=series`)
    Title(&'a str),
}

impl<'a> LookupKey<'a> {
    pub fn parse(identifier: &'a str) -> Self {
        let identifier = identifier.trim();
        if identifier.len() > ID_PREFIX.len() && identifier.starts_with(ID_PREFIX) {
            LookupKey::Id(identifier)
        } else {
            LookupKey::Title(identifier)
        }
    }

    fn params(&self) -> Vec<(&'static str, &'a str)> {
        match *self {
            LookupKey::Id(id) => vec![("i", id)],
            LookupKey::Title(title) => vec![("t", title), ("type", "series")],
        }
    }
}

impl OmdbClient {
    /// Look up a single title by IMDb id or by title.
    pub async fn lookup(&self, identifier: &str) -> crate::Result<Title> {
        let key = LookupKey::parse(identifier);
        tracing::debug!("OMDb lookup: {:?}", key);
        self.get(&key.params()).await
    }

    /// Perform a canned lookup and report whether OMDb answered with a match.
    pub async fn health_check(&self) -> bool {
        match self.lookup(HEALTH_CHECK_TITLE).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("OMDb health check failed: {}", e);
                false
            }
        }
    }
}
