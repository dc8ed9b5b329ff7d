use eyre::{
    bail,
    Result,
};
use ratatui::{
    layout::{
        Constraint,
        Direction,
        Layout,
    },
    prelude::Rect,
};

/// Split the screen: nav header and main content
pub(crate) fn header_and_main_area(area: Rect) -> Result<[Rect; 2]> {
    let constraints = vec![
        Constraint::Max(2), // Header
        Constraint::Min(0), // Main area
    ];

    let [header_area, area] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
    else {
        bail!("Failed to split the area");
    };

    Ok([header_area, area])
}

/// Split the main content: legend on the left, chart on the right
pub(crate) fn legend_and_chart_area(area: Rect) -> Result<[Rect; 2]> {
    let [_header, area] = header_and_main_area(area)?;
    let [legend, chart] = *Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(15), Constraint::Percentage(85)])
        .split(area)
    else {
        bail!("Failed to split the area");
    };
    Ok([legend, chart])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legend_takes_fifteen_percent_of_the_width() {
        let [legend, chart] = legend_and_chart_area(Rect::new(0, 0, 100, 40)).unwrap();
        assert_eq!(legend, Rect::new(0, 2, 15, 38));
        assert_eq!(chart, Rect::new(15, 2, 85, 38));
    }
}
