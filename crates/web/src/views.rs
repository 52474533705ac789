use maud::{html, Markup, PreEscaped, DOCTYPE};
use stargaze_core::domain::apod::{ApodRecord, MediaType};
use stargaze_core::domain::neo::Direction;
use stargaze_core::pagination::NeoPaginator;
use stargaze_core::render::{render_record, Group, Nesting, RowBody};
use uuid::Uuid;

const STYLE: &str = r#"
*{box-sizing:border-box;margin:0;padding:0}
body{background:#000;color:#d1d5db;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;min-height:100vh}
a{color:inherit}
.flex{display:flex}
.index{display:flex;flex-direction:column;gap:1rem;padding:4rem;font-size:2rem}
.apod{display:flex;width:100%;height:100vh}
.apod img,.apod iframe{max-width:50%;height:100vh;border:0}
.caption{display:flex;flex-direction:column;max-width:56rem;margin:0 2rem}
.caption .title{font-size:3rem;margin-bottom:1rem}
.caption .explanation{font-size:1.875rem;margin-bottom:.25rem}
.caption .credit{font-size:1.5rem;margin-left:auto}
.neows{width:fit-content;margin:0 auto;padding:2rem 0}
#head{display:flex;align-items:center}
#head button{background:none;border:0;color:inherit;font-size:1rem;cursor:pointer}
#head button:disabled{opacity:.4;cursor:default}
.pill{margin:0 2rem;font-size:1.875rem;text-decoration:none}
.pill.active{text-decoration:underline}
#body{margin:1rem 2rem 0;background:#1f2937}
.label{display:flex;margin-right:.25rem;font-weight:700}
.error{padding:4rem}
.error h1{font-size:3rem;margin-bottom:1rem}
"#;

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body { (body) }
        }
    }
}

pub fn index_page() -> Markup {
    layout(
        "stargaze",
        html! {
            nav.index {
                a href="/apod" { "Astronomy Picture of the Day" }
                a href="/neows" { "Near-Earth Objects" }
            }
        },
    )
}

pub fn apod_page(apod: &ApodRecord) -> Markup {
    layout(
        &apod.title,
        html! {
            div.apod {
                @match apod.media_type {
                    MediaType::Image => {
                        img src=(apod.display_url()) alt="apod image by nasa";
                    }
                    MediaType::Video => {
                        iframe src=(apod.url) title=(apod.title) allowfullscreen {}
                    }
                    MediaType::Other => {
                        a href=(apod.url) { "open today's entry" }
                    }
                }
                div.caption {
                    span.title { (apod.title) }
                    span.explanation { (apod.explanation) }
                    span.credit { (apod.credit()) }
                }
            }
        },
    )
}

pub fn neows_page(session: Uuid, paginator: &NeoPaginator) -> Markup {
    let selected = paginator.selected_date();

    layout(
        "Near-Earth Objects",
        html! {
            div.neows {
                div #head {
                    (nav_button(session, Direction::Previous, paginator.has_link(Direction::Previous)))
                    @for date in paginator.dates() {
                        a.pill.active[Some(date) == selected]
                            href={ "/neows/" (session) "?date=" (date) } { (date) }
                    }
                    (nav_button(session, Direction::Next, paginator.has_link(Direction::Next)))
                }
                div #body {
                    @for asteroid in paginator.current_bucket() {
                        div.asteroid data-key=[asteroid.id()] {
                            (group(&render_record(asteroid, Nesting::TopLevel)))
                        }
                    }
                }
            }
        },
    )
}

fn nav_button(session: Uuid, direction: Direction, enabled: bool) -> Markup {
    html! {
        form method="post" action={ "/neows/" (session) "/" (direction) } {
            button type="submit" disabled[!enabled] { (direction) }
        }
    }
}

/// HTML for a rendered record tree.
pub fn group(g: &Group) -> Markup {
    let style = format!(
        "margin-bottom:{}rem;margin-left:{}rem",
        g.nesting.margin_bottom_rem(),
        g.nesting.margin_left_rem()
    );

    html! {
        div style=(style) {
            @for row in &g.rows {
                div.flex[row.is_inline()] data-key=(row.key) {
                    div.label { (row.label) ":" }
                    @match &row.body {
                        RowBody::Value(v) => {
                            div.value { (v) }
                        }
                        RowBody::Group(nested) => {
                            (group(nested))
                        }
                    }
                }
            }
        }
    }
}

pub fn error_page(status: u16, message: &str) -> Markup {
    layout(
        "Something went wrong",
        html! {
            div.error {
                h1 { (status) }
                p { (message) }
                p { a href="/" { "back" } }
            }
        },
    )
}
