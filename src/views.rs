//! HTML pages for browser clients

use crate::pipeline::ScanOutcome;
use html_escape::encode_text;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
pre{white-space:pre-wrap;background:#f4f4f4;padding:1rem}";

/// Upload form posting the `image` field to `/upload`
pub fn index_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Expiration Date Scanner</title>
<style>{style}</style>
</head>
<body>
<h1>Expiration Date Scanner</h1>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="image" accept="image/*" required>
<button type="submit">Scan</button>
</form>
</body>
</html>"#,
        style = STYLE
    )
}

pub fn result_page(outcome: &ScanOutcome) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Scan Result</title>
<style>{style}</style>
</head>
<body>
<h1>Scan Result</h1>
<h2>Extracted Text</h2>
<pre id="extracted-text">{text}</pre>
<h2>Expiration Date</h2>
<p id="expiration-date">{date}</p>
<a href="/">Scan another image</a>
</body>
</html>"#,
        style = STYLE,
        text = encode_text(&outcome.text),
        date = encode_text(outcome.expiration_date.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiration::ExpirationDate;

    #[test]
    fn test_index_page_has_image_field() {
        let page = index_page();
        assert!(page.contains(r#"action="/upload""#));
        assert!(page.contains(r#"name="image""#));
        assert!(page.contains("multipart/form-data"));
    }

    #[test]
    fn test_result_page_shows_both_fields() {
        let outcome = ScanOutcome {
            text: "Best Before 12/31/2025".to_string(),
            expiration_date: ExpirationDate::Found("12/31/2025".to_string()),
        };
        let page = result_page(&outcome);
        assert!(page.contains(r#"<pre id="extracted-text">Best Before 12/31/2025</pre>"#));
        assert!(page.contains(r#"<p id="expiration-date">12/31/2025</p>"#));
    }

    #[test]
    fn test_result_page_escapes_recognized_markup() {
        let outcome = ScanOutcome {
            text: "<script>alert(1)</script> & more".to_string(),
            expiration_date: ExpirationDate::NotFound,
        };
        let page = result_page(&outcome);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("&amp; more"));
        assert!(page.contains(r#"<p id="expiration-date">not found</p>"#));
    }
}
