//! Admin page shells
//!
//! The dashboard itself is a client-side app; the server only hands out the
//! HTML entry points. Registering them as real routes is what lets the
//! session gate redirect anonymous dashboard visitors.

use axum::response::Html;

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="ro">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>FortaFit Admin - Login</title>
</head>
<body>
  <div id="root" data-page="login"></div>
  <script src="/assets/admin.js" defer></script>
</body>
</html>
"#;

const DASHBOARD_PAGE: &str = r#"<!doctype html>
<html lang="ro">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>FortaFit Admin - Dashboard</title>
</head>
<body>
  <div id="root" data-page="dashboard"></div>
  <script src="/assets/admin.js" defer></script>
</body>
</html>
"#;
