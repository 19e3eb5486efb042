use axum::{
    http::header,
    response::{IntoResponse, Response},
};

/// A static file compiled into the binary.
#[derive(Clone, Copy)]
pub struct Asset {
    content_type: &'static str,
    body: &'static str,
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

pub const INDEX_HTML: Asset = Asset {
    content_type: "text/html; charset=utf-8",
    body: include_str!("assets/index.html"),
};

pub const STYLES_CSS: Asset = Asset {
    content_type: "text/css; charset=utf-8",
    body: include_str!("assets/styles.css"),
};

pub const APP_JS: Asset = Asset {
    content_type: "application/javascript; charset=utf-8",
    body: include_str!("assets/app.js"),
};
