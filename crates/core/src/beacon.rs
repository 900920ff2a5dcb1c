//! Web-beacon references embedded in outgoing mail.
//!
//! An open beacon is a 1x1 transparent GIF fetched by the recipient's mail
//! client; a click beacon is a redirect link. Both encode the campaign and
//! recipient ids so the tracking endpoints can attribute the event.

use uuid::Uuid;

/// 1x1 transparent GIF served by the open-tracking endpoint.
pub const PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xff, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x04, 0x01, 0x00, 0x3b,
];

/// URL of the open-tracking pixel for one recipient.
pub fn open_url(base_url: &str, campaign_id: Uuid, recipient_id: Uuid) -> String {
    format!(
        "{}/api/v1/tracking/open/{}/{}",
        base_url.trim_end_matches('/'),
        campaign_id,
        recipient_id
    )
}

/// URL of the click-tracking redirect for one recipient. The original
/// target survives as a query parameter and is always redirected to.
pub fn click_url(base_url: &str, campaign_id: Uuid, recipient_id: Uuid, target: &str) -> String {
    format!(
        "{}/api/v1/tracking/click/{}/{}?url={}",
        base_url.trim_end_matches('/'),
        campaign_id,
        recipient_id,
        urlencoding::encode(target)
    )
}

/// Wraps an authored HTML body in the outbound scaffold and appends the
/// open-tracking pixel. Applied at dispatch time; the stored campaign body
/// stays clean.
pub fn instrument_body(
    body: &str,
    base_url: &str,
    campaign_id: Uuid,
    recipient_id: Uuid,
) -> String {
    let pixel = format!(
        r#"<img src="{}" width="1" height="1" style="display:none;">"#,
        open_url(base_url, campaign_id, recipient_id)
    );
    format!(
        "<!doctype html>\n<html>\n<body style=\"font-family: system-ui, -apple-system, sans-serif;\">\n{body}\n{pixel}\n</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_a_gif() {
        // GIF89a magic, 1x1 logical screen.
        assert_eq!(&PIXEL_GIF[..6], b"GIF89a");
        assert_eq!(PIXEL_GIF[6], 1);
        assert_eq!(PIXEL_GIF[8], 1);
    }

    #[test]
    fn test_open_url_shape() {
        let c = Uuid::new_v4();
        let r = Uuid::new_v4();
        let url = open_url("http://localhost:8080/", c, r);
        assert_eq!(
            url,
            format!("http://localhost:8080/api/v1/tracking/open/{c}/{r}")
        );
    }

    #[test]
    fn test_click_url_encodes_target() {
        let c = Uuid::new_v4();
        let r = Uuid::new_v4();
        let url = click_url("http://localhost:8080", c, r, "https://shop.test/sale?x=1&y=2");
        assert!(url.contains("url=https%3A%2F%2Fshop.test%2Fsale%3Fx%3D1%26y%3D2"));
    }

    #[test]
    fn test_instrument_body_appends_pixel() {
        let c = Uuid::new_v4();
        let r = Uuid::new_v4();
        let out = instrument_body("<p>Hello</p>", "http://localhost:8080", c, r);
        assert!(out.starts_with("<!doctype html>"));
        assert!(out.contains("<p>Hello</p>"));
        assert!(out.contains(&format!("/api/v1/tracking/open/{c}/{r}")));
    }
}
