//! Login, logout and registration handlers.

use axum::{
    Form,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use medisae_persistence::core::{CatalogStore, UserStore};
use tracing::info;

use crate::accounts::{self, LoginForm, LoginOutcome, RegistrationForm, RegistrationOutcome};
use crate::error::RestResult;
use crate::extractors::RequestContext;
use crate::handlers::pages::render_page;
use crate::render::{LoginView, Page, RegisterForm, RegisterView};
use crate::session::{Session, clear_session_cookie, session_cookie};
use crate::state::AppState;

/// `GET /login`
pub async fn login_page_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    render_page(&state, Page::Login, &LoginView::new(context.nav_user()))
}

/// `POST /login`
///
/// On success the session cookie is set and the browser is sent home.
/// Failures re-render the form with an inline message.
pub async fn login_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
    Form(form): Form<LoginForm>,
) -> RestResult<Response>
where
    S: CatalogStore + UserStore + 'static,
{
    let outcome = accounts::login(context.storage(), &form).await?;

    let user = match outcome {
        LoginOutcome::Authenticated(user) => user,
        failure => {
            let message = failure.message().unwrap_or_default();
            let view = LoginView::new(context.nav_user()).with_message(message, form.email.trim());
            return Ok(render_page(&state, Page::Login, &view)?.into_response());
        }
    };

    if let Some(previous) = context.token() {
        state.sessions().remove(previous);
    }
    let token = state.sessions().create(Session::for_user(&user));
    let cookie = session_cookie(&token, state.config().secure_cookies);

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// `GET /logout`
pub async fn logout_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
) -> Response
where
    S: CatalogStore + UserStore + 'static,
{
    if let Some(token) = context.token()
        && let Some(session) = state.sessions().remove(token)
    {
        info!(user_id = session.user_id, "User logged out");
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

/// `GET /register`
pub async fn register_page_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    render_page(&state, Page::Register, &RegisterView::new(context.nav_user()))
}

/// `POST /register`
///
/// Every outcome re-renders the form with its inline message; the fields are
/// echoed back unless the account was created.
pub async fn register_handler<S>(
    State(state): State<AppState<S>>,
    context: RequestContext<S>,
    Form(form): Form<RegistrationForm>,
) -> RestResult<Html<String>>
where
    S: CatalogStore + UserStore + 'static,
{
    let outcome = accounts::register(context.storage(), &form, state.config().bcrypt_cost).await?;

    let echoed = match outcome {
        RegistrationOutcome::Registered(_) => RegisterForm::default(),
        _ => RegisterForm {
            username: form.username.clone(),
            email: form.email.clone(),
            age: form.age.clone().unwrap_or_default(),
            profession: form.profession.clone().unwrap_or_default(),
        },
    };

    let view = RegisterView::new(context.nav_user()).with_message(outcome.message(), echoed);
    render_page(&state, Page::Register, &view)
}
