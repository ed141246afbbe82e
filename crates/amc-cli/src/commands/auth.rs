use amc_api_models::CurrentUser;
use amc_client::routes::{RouteArea, RouteDecision, decide_route};
use amc_client::{AppContext, Credentials};
use anyhow::anyhow;
use serde_json::json;

use crate::cli::{LoginArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::output::{print_json, render_user};

pub(crate) async fn handle_login(
    ctx: &AppContext,
    args: LoginArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let auth = ctx.auth();
    if ctx.session().has_token() {
        if let Err(err) = auth.check_session().await {
            tracing::debug!(error = %err, "seeded token rejected; signing in again");
        }
        let status = auth.status();
        if let (RouteDecision::Redirect(_), Some(user)) =
            (decide_route(&status, RouteArea::Auth), status.user())
        {
            return report_signed_in(ctx, user, output, true);
        }
    }

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?,
    };
    let credentials = Credentials {
        email: args.email,
        password,
    };
    let user = auth.login(&credentials).await?;
    report_signed_in(ctx, &user, output, false)
}

fn report_signed_in(
    ctx: &AppContext,
    user: &CurrentUser,
    output: OutputFormat,
    already: bool,
) -> CliResult<()> {
    let token = ctx.session().token();
    match output {
        OutputFormat::Json => print_json(&json!({ "user": user, "token": token }))?,
        OutputFormat::Table => {
            if already {
                println!(
                    "already signed in as {}; unset AMC_TOKEN to switch accounts",
                    user.display_name()
                );
                return Ok(());
            }
            println!("signed in as {}", user.display_name());
            match token {
                Some(token) => println!("export AMC_TOKEN={token}"),
                None => println!("no bearer token issued; the session is cookie-based"),
            }
        }
    }
    Ok(())
}

pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    let auth = ctx.auth();
    let result = auth.logout().await;
    println!("signed out; unset AMC_TOKEN to forget the token");
    result.map_err(CliError::from)
}

pub(crate) async fn handle_me(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let auth = ctx.auth();
    let checked = auth.check_session().await;
    let status = auth.status();
    match (decide_route(&status, RouteArea::Private), status.user()) {
        (RouteDecision::Render, Some(user)) => render_user(user, output),
        _ => Err(checked.err().map_or_else(CliError::not_signed_in, CliError::from)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_config::ClientSettings;
    use amc_telemetry::Metrics;
    use amc_test_support::fixtures::{error_body, token_envelope};
    use amc_test_support::http::{AUTHORIZATION, bearer};
    use httpmock::MockServer;
    use httpmock::prelude::*;

    fn context(server: &MockServer, token: Option<&str>) -> AppContext {
        let settings = ClientSettings::for_url(server.base_url().parse().expect("valid URL"));
        AppContext::new(
            &settings,
            token.map(str::to_string),
            Metrics::new().expect("metrics"),
        )
        .expect("context")
    }

    #[tokio::test]
    async fn login_with_password_flag_stores_token() {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(token_envelope("T9"));
        });
        let me = server.mock(|when, then| {
            when.method(GET).path("/auth/me").header(AUTHORIZATION, bearer("T9"));
            then.status(200)
                .json_body(json!({"data": {"id": 3, "name": "Ops"}}));
        });

        let ctx = context(&server, None);
        handle_login(
            &ctx,
            LoginArgs {
                email: "ops@example.com".to_string(),
                password: Some("secret".to_string()),
            },
            OutputFormat::Json,
        )
        .await
        .expect("login");

        login.assert();
        me.assert();
        assert_eq!(ctx.session().token().as_deref(), Some("T9"));
    }

    #[tokio::test]
    async fn valid_seeded_session_skips_sign_in() {
        let server = MockServer::start_async().await;
        let login = server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(token_envelope("T9"));
        });
        let me = server.mock(|when, then| {
            when.method(GET).path("/auth/me").header(AUTHORIZATION, bearer("T1"));
            then.status(200)
                .json_body(json!({"data": {"id": 3, "name": "Ops"}}));
        });

        let ctx = context(&server, Some("T1"));
        handle_login(
            &ctx,
            LoginArgs {
                email: "ops@example.com".to_string(),
                password: Some("secret".to_string()),
            },
            OutputFormat::Table,
        )
        .await
        .expect("already signed in");

        me.assert();
        login.assert_calls(0);
        assert_eq!(ctx.session().token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn expired_seeded_session_signs_in_again() {
        let server = MockServer::start_async().await;
        let stale_me = server.mock(|when, then| {
            when.method(GET).path("/auth/me").header(AUTHORIZATION, bearer("OLD"));
            then.status(401);
        });
        server.mock(|when, then| {
            when.method(GET).path("/auth/refresh-token");
            then.status(401);
        });
        let login = server.mock(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(token_envelope("T9"));
        });
        let fresh_me = server.mock(|when, then| {
            when.method(GET).path("/auth/me").header(AUTHORIZATION, bearer("T9"));
            then.status(200)
                .json_body(json!({"data": {"id": 3, "name": "Ops"}}));
        });

        let ctx = context(&server, Some("OLD"));
        handle_login(
            &ctx,
            LoginArgs {
                email: "ops@example.com".to_string(),
                password: Some("secret".to_string()),
            },
            OutputFormat::Json,
        )
        .await
        .expect("login");

        stale_me.assert();
        login.assert();
        fresh_me.assert();
        assert_eq!(ctx.session().token().as_deref(), Some("T9"));
    }

    #[tokio::test]
    async fn invalid_email_is_a_validation_error() {
        let server = MockServer::start_async().await;
        let ctx = context(&server, None);
        let err = handle_login(
            &ctx,
            LoginArgs {
                email: "ops".to_string(),
                password: Some("secret".to_string()),
            },
            OutputFormat::Table,
        )
        .await
        .expect_err("invalid");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn logout_failure_is_reported_after_clearing() {
        let server = MockServer::start_async().await;
        let logout = server.mock(|when, then| {
            when.method(GET).path("/auth/logout");
            then.status(500).json_body(error_body("down"));
        });

        let ctx = context(&server, Some("T1"));
        let err = handle_logout(&ctx).await.expect_err("server failure");

        logout.assert();
        assert_eq!(err.exit_code(), 3);
        assert!(!ctx.session().has_token());
    }

    #[tokio::test]
    async fn me_without_session_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(401);
        });
        server.mock(|when, then| {
            when.method(GET).path("/auth/refresh-token");
            then.status(401);
        });

        let ctx = context(&server, None);
        let err = handle_me(&ctx, OutputFormat::Table).await.expect_err("signed out");
        assert!(err.display_message().contains("amc login"));
    }
}
