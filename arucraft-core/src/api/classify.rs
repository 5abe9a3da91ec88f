//! Response classification
//!
//! Pure functions map a transport status or an envelope to an [`ApiIssue`].
//! [`NoticeDispatcher`] turns an issue into a toast and, for expired
//! sessions, a logout. Keeping the two apart lets the mapping be tested
//! without any HTTP traffic.

use std::sync::Arc;

use tracing::warn;

use crate::models::SUCCESS_CODE;
use crate::notify::{Notification, Notifier};
use crate::session::Session;

const PANEL_TITLE: &str = "aruCraftR API";
const API_ERROR_TITLE: &str = "API错误";
const NETWORK_ERROR_TITLE: &str = "网络错误";

const MSG_SESSION_EXPIRED: &str = "会话已过期, 请重新登录";
const MSG_SESSION_INVALID: &str = "会话失效, 请重新登录";
const MSG_NOT_FOUND: &str = "请求的API不存在";
const MSG_VALIDATION: &str = "请求数据不符合对应API指定的格式";
const MSG_UNKNOWN: &str = "未知错误";

/// Which part of the response reported the problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The `code` of a response envelope
    Envelope,
    /// The HTTP status line
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiIssue {
    /// 401 from the panel backend
    SessionExpired(Layer),
    /// 404
    NotFound(Layer),
    /// HTTP 422
    Validation,
    /// Envelope error code on an HTTP 200 response
    Application { code: i64, message: Option<String> },
    /// Any other non-2xx status
    Status(u16),
    /// The request never got a response
    Network {
        name: String,
        message: String,
        /// Set for calls to a third-party base URL
        base: Option<String>,
    },
}

impl ApiIssue {
    /// Whether the session must be torn down
    pub fn requires_logout(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// Toast shown to the user
    pub fn notification(&self) -> Notification {
        match self {
            Self::SessionExpired(Layer::Envelope) => {
                Notification::error(PANEL_TITLE, MSG_SESSION_EXPIRED)
            }
            Self::SessionExpired(Layer::Transport) => {
                Notification::error(API_ERROR_TITLE, MSG_SESSION_INVALID)
            }
            Self::NotFound(Layer::Envelope) => Notification::error(PANEL_TITLE, MSG_NOT_FOUND),
            Self::NotFound(Layer::Transport) => Notification::error(API_ERROR_TITLE, MSG_NOT_FOUND),
            Self::Validation => Notification::error(API_ERROR_TITLE, MSG_VALIDATION),
            Self::Application { message, .. } => Notification::warning(
                PANEL_TITLE,
                message.as_deref().unwrap_or(MSG_UNKNOWN),
            ),
            Self::Status(status) => {
                Notification::error(API_ERROR_TITLE, format!("Status: {}", status))
            }
            Self::Network {
                name,
                message,
                base,
            } => {
                let title = match base {
                    Some(base) => format!("{} ({})", NETWORK_ERROR_TITLE, base),
                    None => NETWORK_ERROR_TITLE.to_string(),
                };
                Notification::error(title, format!("{}: {}", name, message))
            }
        }
    }
}

/// Classify the envelope of a response whose transport status was 2xx
///
/// 401 and 404 are reported for any 2xx status. Other error codes are only
/// reported when the transport status is exactly 200, meaning the backend
/// deliberately signalled an application error.
pub fn classify_envelope(transport_status: u16, code: i64, msg: &str) -> Option<ApiIssue> {
    match code {
        SUCCESS_CODE => None,
        401 => Some(ApiIssue::SessionExpired(Layer::Envelope)),
        404 => Some(ApiIssue::NotFound(Layer::Envelope)),
        code if transport_status == 200 => Some(ApiIssue::Application {
            code,
            message: Some(msg.to_string()).filter(|m| !m.is_empty()),
        }),
        _ => None,
    }
}

/// Classify the HTTP status of a panel API response; `None` for 2xx
pub fn classify_status(status: u16) -> Option<ApiIssue> {
    match status {
        200..=299 => None,
        401 => Some(ApiIssue::SessionExpired(Layer::Transport)),
        404 => Some(ApiIssue::NotFound(Layer::Transport)),
        422 => Some(ApiIssue::Validation),
        other => Some(ApiIssue::Status(other)),
    }
}

/// Classify the HTTP status of a third-party response; `None` for 2xx
///
/// A foreign service cannot expire the panel session, so 401 is just
/// another status here.
pub fn classify_external_status(status: u16) -> Option<ApiIssue> {
    match status {
        200..=299 => None,
        404 => Some(ApiIssue::NotFound(Layer::Transport)),
        other => Some(ApiIssue::Status(other)),
    }
}

/// Describe a transport failure that produced no response
pub fn classify_network(error: &reqwest::Error, base: Option<&str>) -> ApiIssue {
    let name = if error.is_timeout() {
        "TimeoutError"
    } else if error.is_connect() {
        "ConnectError"
    } else if error.is_builder() {
        "BuilderError"
    } else if error.is_redirect() {
        "RedirectError"
    } else if error.is_body() || error.is_decode() {
        "BodyError"
    } else {
        "RequestError"
    };

    ApiIssue::Network {
        name: name.to_string(),
        message: error.to_string(),
        base: base.map(String::from),
    }
}

/// Applies the side effects of a classified issue
#[derive(Clone)]
pub struct NoticeDispatcher {
    notifier: Arc<dyn Notifier>,
    session: Session,
}

impl NoticeDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, session: Session) -> Self {
        Self { notifier, session }
    }

    pub fn dispatch(&self, issue: &ApiIssue) {
        warn!(?issue, "API request reported a problem");
        self.notifier.notify(issue.notification());
        if issue.requires_logout() {
            self.session.logout();
        }
    }
}

impl std::fmt::Debug for NoticeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeDispatcher")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
