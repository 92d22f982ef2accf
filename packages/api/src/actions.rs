//! Typed write operations behind the purchase, favorite and paper screens.
//! All of them go through [`QueryClient::mutate`], so the lists they affect
//! refresh on their own.

use serde::Deserialize;
use serde_json::Value;
use store::validation;
use store::views::TicketSelection;
use store::Conference;

use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::query::QueryClient;
use crate::transport::{FilePart, MultipartForm, RequestBody};

/// Where to complete a payment, as returned by `CreatePayment`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    #[serde(default, alias = "checkoutUrl", alias = "url")]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

pub async fn purchase_tickets(
    queries: &QueryClient,
    conference: &Conference,
    selection: &TicketSelection,
) -> Result<PaymentSession, ApiError> {
    let order = selection.to_order(conference)?;
    let body = serde_json::to_value(&order).map_err(|e| ApiError::Decode(e.to_string()))?;
    let session: Option<PaymentSession> = queries
        .mutate(Endpoint::CreatePayment, RequestBody::Json(body))
        .await?;
    tracing::info!(
        "Created payment for {} tickets to {}",
        selection.total_quantity(),
        conference.conference_id
    );
    Ok(session.unwrap_or_default())
}

pub async fn set_favorite(
    queries: &QueryClient,
    conference_id: &str,
    favorite: bool,
) -> Result<(), ApiError> {
    let conference_id = conference_id.to_string();
    let endpoint = if favorite {
        Endpoint::AddFavorite { conference_id }
    } else {
        Endpoint::RemoveFavorite { conference_id }
    };
    let _: Value = queries.mutate(endpoint, RequestBody::Empty).await?;
    Ok(())
}

/// Input of the abstract submission form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbstractSubmission {
    pub conference_id: String,
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub file: Option<FilePart>,
}

impl AbstractSubmission {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::require("conferenceId", &self.conference_id)?;
        validation::require("title", &self.title)?;
        validation::require("abstract", &self.abstract_text)?;
        if self.file.is_none() {
            return Err(ApiError::validation("file", "Please attach the abstract file"));
        }
        Ok(())
    }
}

pub async fn submit_abstract(
    queries: &QueryClient,
    submission: &AbstractSubmission,
) -> Result<Value, ApiError> {
    submission.validate()?;
    let mut form = MultipartForm::new()
        .text("ConferenceId", submission.conference_id.as_str())
        .text("Title", submission.title.trim())
        .text("Abstract", submission.abstract_text.trim());
    if !submission.keywords.is_empty() {
        form = form.text("Keywords", submission.keywords.join(","));
    }
    if let Some(file) = &submission.file {
        form = form.file("AbstractFile", file.clone());
    }
    queries
        .mutate(Endpoint::SubmitAbstract, RequestBody::Multipart(form))
        .await
}

pub async fn submit_revision(
    queries: &QueryClient,
    paper_id: &str,
    file: FilePart,
    note: Option<&str>,
) -> Result<Value, ApiError> {
    validation::require("paperId", paper_id)?;
    let form = MultipartForm::new()
        .text_opt("Note", note.map(str::trim).filter(|n| !n.is_empty()))
        .file("RevisionFile", file);
    queries
        .mutate(
            Endpoint::SubmitPaperRevision {
                id: paper_id.to_string(),
            },
            RequestBody::Multipart(form),
        )
        .await
}

/// Conference ids in an `OwnFavorites` payload.
pub fn favorite_ids(favorites: &Value) -> Vec<String> {
    favorites
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|f| {
                    f.get("conferenceId")
                        .or_else(|| f.get("id"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::query::QueryOptions;
    use crate::transport::testing::{ok, ScriptedTransport};
    use serde_json::json;
    use std::time::Duration;

    fn conference() -> Conference {
        serde_json::from_value(json!({
            "conferenceId": "c1",
            "conferenceName": "RustConf",
            "conferencePrices": [
                { "conferencePriceId": "p1", "ticketName": "Standard", "ticketPrice": 100.0, "availableSlot": 5 },
            ],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_purchase_posts_order() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, ok(json!({ "paymentUrl": "https://pay.test/abc" })));
        let queries = QueryClient::new(client(&transport));

        let mut selection = TicketSelection::new();
        selection.set("p1", 2);
        let session = purchase_tickets(&queries, &conference(), &selection).await.unwrap();
        assert_eq!(session.payment_url.as_deref(), Some("https://pay.test/abc"));

        let sent = &transport.requests()[0];
        assert!(sent.url.ends_with("/Payment/create-payment"));
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({
                "conferenceId": "c1",
                "tickets": [{ "conferencePriceId": "p1", "quantity": 2 }],
            }))
        );
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected_locally() {
        let transport = ScriptedTransport::new();
        let queries = QueryClient::new(client(&transport));
        let err = purchase_tickets(&queries, &conference(), &TicketSelection::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_removing_favorite_refreshes_favorites() {
        let transport = ScriptedTransport::new();
        transport.delay(Duration::from_millis(5)).fallback(|req| {
            let body = if req.url.ends_with("/Favourite/get-own-favourites") {
                ok(json!([{ "conferenceId": "c1" }]))
            } else {
                ok(Value::Null)
            };
            Ok(crate::transport::HttpResponse { status: 200, body: body.to_string() })
        });
        let queries = QueryClient::new(client(&transport));
        let mut favorites = queries.query::<Value>(Endpoint::OwnFavorites, QueryOptions::default());
        while favorites.state().data.is_none() {
            assert!(favorites.changed().await);
        }
        assert_eq!(favorite_ids(&favorites.state().data.unwrap()), vec!["c1"]);

        set_favorite(&queries, "c1", false).await.unwrap();
        assert!(favorites.state().is_fetching);
        assert_eq!(
            transport.requests()[1].method,
            crate::endpoint::Method::Delete
        );
    }

    #[test]
    fn test_abstract_requires_file() {
        let submission = AbstractSubmission {
            conference_id: "c1".into(),
            title: "Ownership at scale".into(),
            abstract_text: "We study...".into(),
            keywords: vec![],
            file: None,
        };
        let err = submission.validate().unwrap_err();
        match err {
            ApiError::Validation(v) => assert_eq!(v.field, "file"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
