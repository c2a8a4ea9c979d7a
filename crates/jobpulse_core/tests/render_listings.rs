use jobpulse_core::{
    render_listings, Control, Listing, ListingPage, ListingRow, UiCommand, ViewState, MAX_TAGS,
};
use pretty_assertions::assert_eq;

fn rows(commands: &[UiCommand]) -> Vec<ListingRow> {
    commands
        .iter()
        .find_map(|cmd| match cmd {
            UiCommand::PopulateListings { rows } => Some(rows.clone()),
            _ => None,
        })
        .expect("populate command")
}

fn enabled(commands: &[UiCommand], wanted: Control) -> bool {
    commands
        .iter()
        .find_map(|cmd| match cmd {
            UiCommand::SetControlEnabled { control, enabled } if *control == wanted => {
                Some(*enabled)
            }
            _ => None,
        })
        .expect("enable command")
}

fn text(commands: &[UiCommand], wanted: Control) -> String {
    commands
        .iter()
        .find_map(|cmd| match cmd {
            UiCommand::SetText { control, text } if *control == wanted => Some(text.clone()),
            _ => None,
        })
        .expect("text command")
}

fn single(listing: Listing) -> ListingPage {
    ListingPage {
        listings: vec![listing],
        total: 1,
        page: 1,
        limit: None,
    }
}

#[test]
fn markup_in_scraped_fields_is_escaped() {
    let mut view = ViewState::new();
    let page = single(Listing {
        title: "<b>X</b>".to_string(),
        company: "<script>alert(1)</script>".to_string(),
        location: Some("<i>Berlin</i>".to_string()),
        tags: vec!["<img src=x onerror=y>".to_string()],
        url: Some("https://example.com/?a=1&b=\"2\"".to_string()),
        source: "remoteok".to_string(),
        ..Listing::default()
    });

    let commands = render_listings(&mut view, &page);
    let html = rows(&commands)[0].to_html();

    assert!(!html.contains("<b>"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<i>"));
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;b&gt;X"));
    assert!(html.contains("<a href=\"https:"));
    assert!(html.contains("example.com"));
    assert!(!html.contains("\"2\""));
}

#[test]
fn title_without_safe_url_is_plain_text() {
    let mut view = ViewState::new();
    for url in [None, Some("javascript:alert(1)".to_string())] {
        let page = single(Listing {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            url,
            ..Listing::default()
        });
        let row = rows(&render_listings(&mut view, &page)).remove(0);
        assert_eq!(row.href, None);
        assert!(row.to_html().starts_with("<tr><td>Backend Engineer</td>"));
    }
}

#[test]
fn missing_location_and_salary_render_placeholders() {
    let mut view = ViewState::new();
    let page = single(Listing {
        title: "Dev".to_string(),
        company: "Acme".to_string(),
        location: Some("   ".to_string()),
        ..Listing::default()
    });
    let row = rows(&render_listings(&mut view, &page)).remove(0);
    assert_eq!(row.location, "-");
    assert_eq!(row.salary, "-");
}

#[test]
fn tags_are_capped_in_order() {
    let mut view = ViewState::new();
    let tags: Vec<String> = (1..=7).map(|i| format!("tag{i}")).collect();
    let page = single(Listing {
        title: "Dev".to_string(),
        company: "Acme".to_string(),
        tags: tags.clone(),
        salary_min: Some(120_000),
        salary_max: Some(150_000),
        currency: Some("USD".to_string()),
        ..Listing::default()
    });
    let row = rows(&render_listings(&mut view, &page)).remove(0);
    assert_eq!(row.tags, tags[..MAX_TAGS].to_vec());
    assert_eq!(row.salary, "$120k - $150k");
}

#[test]
fn rows_keep_server_order() {
    let mut view = ViewState::new();
    let page = ListingPage {
        listings: ["zeta", "alpha", "mid"]
            .iter()
            .map(|title| Listing {
                title: title.to_string(),
                company: "Acme".to_string(),
                ..Listing::default()
            })
            .collect(),
        total: 3,
        page: 1,
        limit: None,
    };
    let titles: Vec<_> = rows(&render_listings(&mut view, &page))
        .into_iter()
        .map(|row| row.title)
        .collect();
    assert_eq!(titles, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn pagination_controls_follow_total() {
    let cases = [
        // (total, page, prev_enabled, next_enabled, label)
        (0, 1, false, false, "Page 1 of 1"),
        (50, 1, false, false, "Page 1 of 1"),
        (51, 1, false, true, "Page 1 of 2"),
        (51, 2, true, false, "Page 2 of 2"),
        (1000, 7, true, true, "Page 7 of 20"),
    ];
    for (total, page, prev, next, label) in cases {
        let mut view = ViewState::new();
        let commands = render_listings(
            &mut view,
            &ListingPage {
                listings: Vec::new(),
                total,
                page,
                limit: None,
            },
        );
        assert_eq!(enabled(&commands, Control::PrevButton), prev, "total {total} page {page}");
        assert_eq!(enabled(&commands, Control::NextButton), next, "total {total} page {page}");
        assert_eq!(text(&commands, Control::PageLabel), label);
        assert_eq!(view.page(), page);
    }
}

#[test]
fn total_count_is_grouped() {
    let mut view = ViewState::new();
    let commands = render_listings(
        &mut view,
        &ListingPage {
            listings: Vec::new(),
            total: 12_345,
            page: 1,
            limit: None,
        },
    );
    assert_eq!(text(&commands, Control::TotalCountLabel), "12,345");
    assert_eq!(view.total(), Some(12_345));
}

#[test]
fn terminal_control_sequences_are_removed_from_rows() {
    let mut view = ViewState::new();
    let page = single(Listing {
        title: "\u{1b}]0;owned\u{7}\u{1b}[2JDev".to_string(),
        company: "AT&T\u{1b}[31m".to_string(),
        location: Some("\u{7}\u{7}".to_string()),
        tags: vec!["ru\u{1b}[0mst".to_string()],
        source: "remoteok\r".to_string(),
        ..Listing::default()
    });

    let row = rows(&render_listings(&mut view, &page)).remove(0);

    assert_eq!(row.title, "]0;owned[2JDev");
    assert_eq!(row.company, "AT&T[31m");
    assert_eq!(row.location, "-");
    assert_eq!(row.tags, vec!["ru[0mst".to_string()]);
    assert_eq!(row.source, "remoteok");
    // Plain text stays plain; markup escaping happens on the page side.
    assert!(row.to_html().contains("AT&amp;T"));
}
