//! NCBI E-utilities client
//!
//! Speaks the JSON flavor of esearch / esummary / elink. Every call runs
//! behind a bounded exponential-backoff retry; 4xx responses are treated as
//! permanent, transport failures and 5xx as transient.

use super::{AuthorSearch, BiblioLookup, CrossRefLinks, SessionToken};
use crate::config::LookupConfig;
use crate::errors::{LookupError, Result};
use crate::models::{PaperId, Record};
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const LINKNAME_REFS: &str = "pubmed_pubmed_refs";
const LINKNAME_CITEDIN: &str = "pubmed_pubmed_citedin";

/// PubMed E-utilities lookup client
pub struct EntrezLookup {
    client: reqwest::Client,
    config: LookupConfig,
}

#[derive(Deserialize)]
struct EsearchEnvelope {
    esearchresult: EsearchResult,
}

#[derive(Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    webenv: Option<String>,
    querykey: Option<String>,
}

impl EntrezLookup {
    /// Create a new client from lookup configuration
    pub fn new(config: LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Configuration {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Parameters every E-utilities call carries
    fn common_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("retmode".to_string(), "json".to_string()),
        ];
        if let Some(email) = &self.config.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(key) = &self.config.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }

    async fn get_json_once(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);

        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// One E-utilities round trip with bounded retry
    async fn get_json(&self, endpoint: &str, params: Vec<(String, String)>) -> Result<Value> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_budget_secs)),
            ..ExponentialBackoff::default()
        };

        retry(backoff, || async {
            self.get_json_once(endpoint, &params).await.map_err(|e| {
                if e.is_transient() {
                    warn!(endpoint, error = %e, "Transient lookup failure, retrying");
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        })
        .await
    }
}

/// Convert a wire author name ("Smith JA") into the `"surname, givennames"`
/// form the rest of the system expects. The last space-separated token is
/// the given-name part; multiword surnames keep their internal spaces.
fn comma_form(wire: &str) -> String {
    match wire.trim().rsplit_once(' ') {
        Some((surname, given)) if !given.is_empty() => format!("{}, {}", surname, given),
        _ => wire.trim().to_string(),
    }
}

/// Parse one esummary document into a Record
fn parse_summary_doc(id: &str, doc: &Value) -> Record {
    let authors: Vec<String> = doc
        .get("authors")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .map(comma_form)
                .collect()
        })
        .unwrap_or_default();

    let field = |key: &str| {
        doc.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Record {
        id: id.into(),
        title: field("title"),
        journal: field("fulljournalname").or_else(|| field("source")),
        date: field("pubdate"),
        first_author: authors.first().cloned(),
        last_author: authors.last().cloned(),
        authors,
    }
}

/// Parse an esummary envelope into Records, preserving uid order
fn parse_summary(value: &Value) -> Result<Vec<Record>> {
    let result = value
        .get("result")
        .ok_or_else(|| LookupError::MalformedResponse {
            endpoint: "esummary".to_string(),
            message: "missing result object".to_string(),
        })?;

    let uids = result
        .get("uids")
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::MalformedResponse {
            endpoint: "esummary".to_string(),
            message: "missing uids list".to_string(),
        })?;

    let mut records = Vec::with_capacity(uids.len());
    for uid in uids {
        let Some(uid) = uid.as_str() else { continue };
        match result.get(uid) {
            Some(doc) => records.push(parse_summary_doc(uid, doc)),
            None => debug!(uid, "esummary listed a uid without a document"),
        }
    }
    Ok(records)
}

fn link_id(value: &Value) -> Option<PaperId> {
    if let Some(s) = value.as_str() {
        return Some(s.into());
    }
    if let Some(n) = value.as_u64() {
        return Some(n.to_string().into());
    }
    // Older servers wrap each link as {"id": "..."}
    value
        .get("id")
        .and_then(Value::as_str)
        .map(Into::into)
}

/// Parse an elink envelope into reference / cited-by id lists
fn parse_links(value: &Value) -> CrossRefLinks {
    let mut links = CrossRefLinks::default();

    let linksets = value.get("linksets").and_then(Value::as_array);
    for linkset in linksets.into_iter().flatten() {
        let dbs = linkset.get("linksetdbs").and_then(Value::as_array);
        for db in dbs.into_iter().flatten() {
            let linkname = db.get("linkname").and_then(Value::as_str).unwrap_or("");
            let ids = db
                .get("links")
                .and_then(Value::as_array)
                .map(|arr| arr.iter().filter_map(link_id).collect::<Vec<_>>())
                .unwrap_or_default();

            match linkname {
                LINKNAME_REFS => links.references.extend(ids),
                LINKNAME_CITEDIN => links.cited_by.extend(ids),
                _ => {}
            }
        }
    }

    links
}

fn join_ids(ids: &[PaperId]) -> String {
    ids.iter()
        .map(PaperId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl BiblioLookup for EntrezLookup {
    async fn search_by_author(
        &self,
        name: &str,
        affiliation: Option<&str>,
    ) -> Result<AuthorSearch> {
        let term = match affiliation {
            Some(aff) if !aff.is_empty() => format!("{} AND {}", name, aff),
            _ => name.to_string(),
        };

        let mut params = self.common_params();
        params.push(("term".to_string(), term));
        params.push(("retmax".to_string(), self.config.retmax.to_string()));
        params.push(("usehistory".to_string(), "y".to_string()));

        let value = self.get_json("esearch.fcgi", params).await?;
        let envelope: EsearchEnvelope =
            serde_json::from_value(value).map_err(|e| LookupError::MalformedResponse {
                endpoint: "esearch".to_string(),
                message: e.to_string(),
            })?;

        let result = envelope.esearchresult;
        let session = match (result.webenv, result.querykey) {
            (Some(webenv), Some(query_key)) => Some(SessionToken { webenv, query_key }),
            _ => None,
        };

        Ok(AuthorSearch {
            ids: result.idlist.into_iter().map(PaperId::from).collect(),
            session,
        })
    }

    async fn fetch_records(&self, ids: &[PaperId]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(self.config.fetch_batch_size) {
            let mut params = self.common_params();
            params.push(("id".to_string(), join_ids(chunk)));

            let value = self.get_json("esummary.fcgi", params).await?;
            records.extend(parse_summary(&value)?);
        }

        Ok(records)
    }

    async fn cross_reference(&self, ids: &[PaperId]) -> Result<CrossRefLinks> {
        if ids.is_empty() {
            return Ok(CrossRefLinks::default());
        }

        let mut params = self.common_params();
        params.push(("dbfrom".to_string(), "pubmed".to_string()));
        params.push(("id".to_string(), join_ids(ids)));

        let value = self.get_json("elink.fcgi", params).await?;
        Ok(parse_links(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comma_form() {
        assert_eq!(comma_form("Smith JA"), "Smith, JA");
        assert_eq!(comma_form("Consortium"), "Consortium");
    }

    #[test]
    fn test_comma_form_multiword_surname() {
        // Only the last token becomes the given-name part.
        assert_eq!(comma_form("van der Berg J"), "van der Berg, J");
    }

    #[test]
    fn test_parse_summary_order_and_fields() {
        let value = json!({
            "result": {
                "uids": ["100", "200"],
                "100": {
                    "title": "Ribosome assembly",
                    "fulljournalname": "Cell",
                    "pubdate": "2018 Jan",
                    "authors": [
                        {"name": "Smith J", "authtype": "Author"},
                        {"name": "Zhao M", "authtype": "Author"}
                    ]
                },
                "200": {
                    "title": "",
                    "source": "Nature",
                    "authors": []
                }
            }
        });

        let records = parse_summary(&value).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, PaperId::new("100"));
        assert_eq!(records[0].first_author.as_deref(), Some("Smith, J"));
        assert_eq!(records[0].last_author.as_deref(), Some("Zhao, M"));
        assert_eq!(records[0].journal.as_deref(), Some("Cell"));

        // Empty strings degrade to None, source is the journal fallback.
        assert_eq!(records[1].title, None);
        assert_eq!(records[1].journal.as_deref(), Some("Nature"));
        assert!(records[1].first_author.is_none());
    }

    #[test]
    fn test_parse_summary_rejects_missing_result() {
        let err = parse_summary(&json!({"header": {}})).unwrap_err();
        assert!(matches!(err, LookupError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_links_splits_relations() {
        let value = json!({
            "linksets": [{
                "linksetdbs": [
                    {"linkname": "pubmed_pubmed_refs", "links": ["1", "2"]},
                    {"linkname": "pubmed_pubmed_citedin", "links": [3]},
                    {"linkname": "pubmed_pubmed", "links": ["ignored"]}
                ]
            }]
        });

        let links = parse_links(&value);
        assert_eq!(links.references, vec![PaperId::new("1"), PaperId::new("2")]);
        assert_eq!(links.cited_by, vec![PaperId::new("3")]);
    }

    #[test]
    fn test_parse_links_missing_relations_are_empty() {
        let links = parse_links(&json!({"linksets": []}));
        assert!(links.references.is_empty());
        assert!(links.cited_by.is_empty());
    }

    #[test]
    fn test_esearch_envelope_shape() {
        let value = json!({
            "esearchresult": {
                "idlist": ["11", "22"],
                "webenv": "MCID_abc",
                "querykey": "1"
            }
        });
        let envelope: EsearchEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(envelope.esearchresult.idlist, vec!["11", "22"]);
        assert_eq!(envelope.esearchresult.webenv.as_deref(), Some("MCID_abc"));
    }
}
