use feed_engine::FeedSnapshot;

/// Lines to print for the transition from `previous` to `current`.
///
/// A new query generation reprints the header and the whole list; otherwise
/// only appended items and status changes are printed.
pub fn render(
    previous: Option<&FeedSnapshot>,
    current: &FeedSnapshot,
    low_data_images: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    let same_generation = previous.is_some_and(|prev| prev.generation == current.generation);

    let start = match previous {
        Some(prev) if same_generation => prev.len().min(current.len()),
        _ => {
            if let Some(query) = &current.query {
                lines.push(format!("== {query} =="));
            }
            0
        }
    };

    for (index, item) in current.items.iter().enumerate().skip(start) {
        let mut line = format!("{index:>4}. {} by {}", item.title, item.author);
        if !low_data_images && item.thumbnail_url.is_some() {
            line.push_str(" [img]");
        }
        if let Some(url) = &item.detail_url {
            line.push_str(&format!(" <{url}>"));
        }
        lines.push(line);
    }

    let status_changed = previous.map_or(true, |prev| prev.status != current.status);
    if status_changed && current.query.is_some() {
        lines.push(format!("-- {} ({} items)", current.status, current.len()));
    }
    lines
}
