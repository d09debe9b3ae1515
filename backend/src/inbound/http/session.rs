//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with the logged-in
//! user id and queued flash messages.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flash";

/// Severity attached to a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// One queued message shown on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// JSON body carrying the message a page would have shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id, rotating the session.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A value that no longer decodes counts as logged out.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i32>(USER_ID_KEY) {
            Ok(id) => id.map(UserId::new),
            Err(error) => {
                tracing::warn!(%error, "invalid user id in session cookie");
                None
            }
        }
    }

    /// Drop everything stored for the caller, keeping the cookie usable for
    /// a follow-up flash message.
    pub fn clear(&self) {
        self.0.clear();
        self.0.renew();
    }

    /// Queue a flash message.
    pub fn flash(&self, level: FlashLevel, message: impl Into<String>) -> Result<(), Error> {
        let mut queued = self.read_flashes();
        queued.push(FlashMessage {
            level,
            message: message.into(),
        });
        self.0
            .insert(FLASH_KEY, queued)
            .map_err(|error| Error::internal(format!("failed to queue flash message: {error}")))
    }

    /// Return and clear every queued flash message.
    pub fn take_flashes(&self) -> Vec<FlashMessage> {
        let queued = self.read_flashes();
        self.0.remove(FLASH_KEY);
        queued
    }

    /// Queue the error's message as a `danger` flash and hand it back.
    ///
    /// Internal errors are not echoed; their message is redacted anyway.
    pub fn flash_failure(&self, error: Error) -> Error {
        if error.code() != crate::domain::ErrorCode::InternalError {
            if let Err(flash_error) = self.flash(FlashLevel::Danger, error.message()) {
                tracing::warn!(error = %flash_error, "could not queue failure flash");
            }
        }
        error
    }

    fn read_flashes(&self) -> Vec<FlashMessage> {
        self.0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "discarding unreadable flash messages");
                None
            })
            .unwrap_or_default()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(UserId::new(7))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id();
                        HttpResponse::Ok().body(format!("{id:?}"))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body, format!("{:?}", Some(UserId::new(7))));
    }

    #[actix_web::test]
    async fn tampered_user_id_reads_as_logged_out() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-number")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id();
                        HttpResponse::Ok().body(format!("{}", id.is_some()))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "false");
    }

    #[actix_web::test]
    async fn flashes_drain_once() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/push",
                    web::get().to(|session: SessionContext| async move {
                        session.flash(FlashLevel::Success, "Asset added successfully")?;
                        session.flash(FlashLevel::Info, "Logged out")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        HttpResponse::Ok().json(session.take_flashes())
                    }),
                ),
        )
        .await;

        let push =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let cookie = push
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let drained_cookie = first
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("drained session re-issued")
            .into_owned();
        let messages: Vec<FlashMessage> = test::read_body_json(first).await;
        assert_eq!(
            messages,
            vec![
                FlashMessage {
                    level: FlashLevel::Success,
                    message: "Asset added successfully".into(),
                },
                FlashMessage {
                    level: FlashLevel::Info,
                    message: "Logged out".into(),
                },
            ]
        );

        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(drained_cookie)
                .to_request(),
        )
        .await;
        let messages: Vec<FlashMessage> = test::read_body_json(second).await;
        assert!(messages.is_empty());
    }
}
