//! # Endpoint catalogue
//!
//! Every backend route the client calls is a variant of [`Endpoint`]. A variant
//! knows its HTTP method, path template and query string, which
//! [`ResourceType`] it reads, and which resource types a successful call
//! invalidates in the query cache.
//!
//! | Family | Variants | Invalidates |
//! |--------|----------|-------------|
//! | Auth | `Login`, `Register`, `ForgetPassword`, `RefreshToken` | user-owned data on login |
//! | Users | `Users`, `User`, `UpdateUser` | `User` |
//! | Conferences | `PaginatedConferences`, `Conference`, `TechnicalConference`, `ResearchConference`, `ConferenceCategories` | |
//! | Payments | `OwnTransactions`, `CreatePayment` | `Ticket`, `Transaction`, `Conference` |
//! | Tickets | `OwnTickets` | |
//! | Favorites | `OwnFavorites`, `AddFavorite`, `RemoveFavorite` | `Favorite`, `Conference` |
//! | Papers | `OwnPapers`, `Paper`, `SubmitAbstract`, `SubmitPaperRevision` | `Paper` |
//!
//! Endpoints serialize to JSON with sorted keys, which is what the query
//! cache uses as the identity of a request.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Auth,
    User,
    Conference,
    Category,
    Ticket,
    Transaction,
    Favorite,
    Paper,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Auth => "auth",
            ResourceType::User => "user",
            ResourceType::Conference => "conference",
            ResourceType::Category => "category",
            ResourceType::Ticket => "ticket",
            ResourceType::Transaction => "transaction",
            ResourceType::Favorite => "favorite",
            ResourceType::Paper => "paper",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Query parameters of the paginated conference listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl ConferenceQuery {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.search_keyword = Some(keyword).filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        let category_id = category_id.into();
        self.category_id = Some(category_id).filter(|c| !c.is_empty());
        self
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("PageNumber", self.page_number.to_string()),
            ("PageSize", self.page_size.to_string()),
        ];
        if let Some(keyword) = &self.search_keyword {
            pairs.push(("SearchKeyword", keyword.clone()));
        }
        if let Some(category) = &self.category_id {
            pairs.push(("ConferenceCategoryId", category.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "endpoint", content = "params", rename_all = "camelCase")]
pub enum Endpoint {
    Login,
    Register,
    ForgetPassword { email: String },
    RefreshToken,

    Users,
    User { id: String },
    UpdateUser { id: String },

    PaginatedConferences(ConferenceQuery),
    Conference { id: String },
    TechnicalConference { id: String },
    ResearchConference { id: String },
    ConferenceCategories,

    OwnTransactions,
    CreatePayment,

    OwnTickets,

    OwnFavorites,
    AddFavorite { conference_id: String },
    RemoveFavorite { conference_id: String },

    OwnPapers,
    Paper { id: String },
    SubmitAbstract,
    SubmitPaperRevision { id: String },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        use Endpoint::*;
        match self {
            Login | Register | ForgetPassword { .. } | RefreshToken | CreatePayment
            | AddFavorite { .. } | SubmitAbstract | SubmitPaperRevision { .. } => Method::Post,
            UpdateUser { .. } => Method::Put,
            RemoveFavorite { .. } => Method::Delete,
            Users | User { .. } | PaginatedConferences(_) | Conference { .. }
            | TechnicalConference { .. } | ResearchConference { .. } | ConferenceCategories
            | OwnTransactions | OwnTickets | OwnFavorites | OwnPapers | Paper { .. } => Method::Get,
        }
    }

    /// Path relative to the API base URL, without the query string.
    pub fn path(&self) -> String {
        use Endpoint::*;
        match self {
            Login => "/Auth/login".into(),
            Register => "/Auth/register".into(),
            ForgetPassword { .. } => "/Auth/forget-password".into(),
            RefreshToken => "/auth/refresh".into(),
            Users => "/users".into(),
            User { id } | UpdateUser { id } => format!("/users/{id}"),
            PaginatedConferences(_) => "/Conference/paginated-conferences".into(),
            Conference { id } => format!("/Conference/{id}"),
            TechnicalConference { id } => format!("/Conference/technical-detail/{id}"),
            ResearchConference { id } => format!("/Conference/research-detail/{id}"),
            ConferenceCategories => "/ConferenceCategory".into(),
            OwnTransactions => "/Payment/get-own-transaction".into(),
            CreatePayment => "/Payment/create-payment".into(),
            OwnTickets => "/Ticket/get-own-tickets".into(),
            OwnFavorites => "/Favourite/get-own-favourites".into(),
            AddFavorite { conference_id } | RemoveFavorite { conference_id } => {
                format!("/Favourite/{conference_id}")
            }
            OwnPapers => "/Paper/get-own-papers".into(),
            Paper { id } => format!("/Paper/{id}"),
            SubmitAbstract => "/Paper/submit-abstract".into(),
            SubmitPaperRevision { id } => format!("/Paper/{id}/revision"),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::ForgetPassword { email } => vec![("email", email.clone())],
            Endpoint::PaginatedConferences(query) => query.to_pairs(),
            _ => Vec::new(),
        }
    }

    /// The resource type this endpoint reads or writes.
    pub fn resource(&self) -> ResourceType {
        use Endpoint::*;
        match self {
            Login | Register | ForgetPassword { .. } | RefreshToken => ResourceType::Auth,
            Users | User { .. } | UpdateUser { .. } => ResourceType::User,
            PaginatedConferences(_) | Conference { .. } | TechnicalConference { .. }
            | ResearchConference { .. } => ResourceType::Conference,
            ConferenceCategories => ResourceType::Category,
            OwnTransactions | CreatePayment => ResourceType::Transaction,
            OwnTickets => ResourceType::Ticket,
            OwnFavorites | AddFavorite { .. } | RemoveFavorite { .. } => ResourceType::Favorite,
            OwnPapers | Paper { .. } | SubmitAbstract | SubmitPaperRevision { .. } => {
                ResourceType::Paper
            }
        }
    }

    /// Resource types whose cached entries are stale after this call succeeds.
    pub fn invalidates(&self) -> &'static [ResourceType] {
        use Endpoint::*;
        use ResourceType as R;
        match self {
            Login => &[R::User, R::Ticket, R::Transaction, R::Favorite, R::Paper],
            Register | UpdateUser { .. } => &[R::User],
            CreatePayment => &[R::Ticket, R::Transaction, R::Conference],
            AddFavorite { .. } | RemoveFavorite { .. } => &[R::Favorite, R::Conference],
            SubmitAbstract | SubmitPaperRevision { .. } => &[R::Paper],
            _ => &[],
        }
    }

    pub fn is_mutation(&self) -> bool {
        self.method() != Method::Get || matches!(self, Endpoint::Login | Endpoint::RefreshToken)
    }

    /// Whether a 401 from this endpoint may trigger a token refresh. Login and
    /// refresh itself never do, which keeps refresh from recursing.
    pub fn allows_refresh(&self) -> bool {
        !matches!(
            self,
            Endpoint::Login | Endpoint::Register | Endpoint::RefreshToken | Endpoint::ForgetPassword { .. }
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method().as_str(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_methods() {
        let cases = [
            (Endpoint::Login, "POST", "/Auth/login"),
            (Endpoint::RefreshToken, "POST", "/auth/refresh"),
            (Endpoint::Conference { id: "c1".into() }, "GET", "/Conference/c1"),
            (
                Endpoint::ResearchConference { id: "c1".into() },
                "GET",
                "/Conference/research-detail/c1",
            ),
            (Endpoint::UpdateUser { id: "u1".into() }, "PUT", "/users/u1"),
            (
                Endpoint::RemoveFavorite { conference_id: "c9".into() },
                "DELETE",
                "/Favourite/c9",
            ),
            (
                Endpoint::SubmitPaperRevision { id: "p1".into() },
                "POST",
                "/Paper/p1/revision",
            ),
        ];
        for (endpoint, method, path) in cases {
            assert_eq!(endpoint.method().as_str(), method);
            assert_eq!(endpoint.path(), path);
        }
    }

    #[test]
    fn test_conference_query_string() {
        let endpoint = Endpoint::PaginatedConferences(
            ConferenceQuery::page(2, 20).with_search("rust").with_category(""),
        );
        assert_eq!(
            endpoint.query(),
            vec![
                ("PageNumber", "2".to_string()),
                ("PageSize", "20".to_string()),
                ("SearchKeyword", "rust".to_string()),
            ]
        );
    }

    #[test]
    fn test_forget_password_email_in_query() {
        let endpoint = Endpoint::ForgetPassword {
            email: "a@b.co".into(),
        };
        assert_eq!(endpoint.query(), vec![("email", "a@b.co".to_string())]);
        assert!(!endpoint.allows_refresh());
    }

    #[test]
    fn test_mutations_declare_invalidations() {
        assert!(Endpoint::CreatePayment
            .invalidates()
            .contains(&ResourceType::Ticket));
        assert!(Endpoint::RemoveFavorite {
            conference_id: "c".into()
        }
        .invalidates()
        .contains(&ResourceType::Favorite));
        assert!(Endpoint::OwnTickets.invalidates().is_empty());
        assert!(Endpoint::Login.is_mutation());
        assert!(!Endpoint::OwnPapers.is_mutation());
    }

    #[test]
    fn test_refresh_never_refreshes() {
        assert!(!Endpoint::RefreshToken.allows_refresh());
        assert!(!Endpoint::Login.allows_refresh());
        assert!(Endpoint::OwnTickets.allows_refresh());
    }
}
