use maud::{html, Markup, DOCTYPE};

use crate::utils;

fn css() -> Markup {
    html! {
        style {
            "body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; color: #222; }"
            "table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }"
            "th, td { border: 1px solid #ccc; padding: .3rem .6rem; text-align: left; }"
            "th { background: #f3f3f3; }"
            "footer { color: #777; font-size: .8rem; }"
            "@media print { body { margin: 0; } footer { display: none; } }"
        }
    }
}

fn header(title: &str) -> Markup {
    html! {
        header {
            h1 { (title) }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer {
            "LexStudy " (utils::VERSION)
        }
    }
}

/// A standalone printable page.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";

                (css())

                title { (format!("{title} - LexStudy")) }
            }

            body {
                (header(title))
                main { (body) }
                (footer())
            }
        }
    }
}
