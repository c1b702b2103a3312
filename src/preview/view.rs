use ratatui::Frame;
use ratatui::layout::Rect as Area;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::Preview;
use super::site::{self, BOTTOM_BAR_ID, PANEL_ID, SIDEBAR_ID, clickable_id};
use crate::nav::registry::{container_id, icon_group_spec};
use crate::nav::{FontStatus, IconGroupId, Phase, Rect, SectionId};

const KEY_HINTS: &str = "1-4 section  a article  ←/→ cycle  [/] back/fwd  m/Esc menu  v tab  f fonts  q quit";

/// Parse a `12.5px` style value
fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.parse().ok()
}

/// Terminal cells covered by a document box, clipped to `clip`
fn cells(rect: Rect, clip: Area) -> Option<Area> {
    let x = rect.x.round().max(0.0) as u16;
    let y = rect.y.round().max(0.0) as u16;
    let width = rect.width.round().max(0.0) as u16;
    let height = rect.height.round().max(0.0) as u16;
    let area = Area::new(x, y, width, height).intersection(clip);
    (area.width > 0 && area.height > 0).then_some(area)
}

fn glyph(group: IconGroupId) -> &'static str {
    match group {
        IconGroupId::Home => "⌂",
        IconGroupId::Repos => "⎇",
        IconGroupId::Blog => "✎",
        IconGroupId::Contact => "✉",
    }
}

pub fn render(frame: &mut Frame, preview: &Preview) {
    let screen = frame.area();
    let theme = preview.theme();
    frame.render_widget(Block::default().style(theme.base_style()), screen);

    let Some(regions) = preview.regions().copied() else {
        return;
    };

    render_header(frame, preview, regions.header);
    render_sidebar(frame, preview, regions.sidebar);
    render_content(frame, preview, regions.content);
    render_bottom_bar(frame, preview, screen);
    render_status(frame, preview, regions.status);
    render_menu(frame, preview, regions.content);
}

fn render_header(frame: &mut Frame, preview: &Preview, area: Area) {
    let theme = preview.theme();
    let line = Line::from(vec![
        Span::styled(" pageflow ", Style::default().fg(theme.heading).add_modifier(Modifier::BOLD)),
        Span::styled(preview.location(), Style::default().fg(theme.link)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_sidebar(frame: &mut Frame, preview: &Preview, area: Area) {
    let theme = preview.theme();
    let doc = preview.document();
    frame.render_widget(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(theme.border_style()),
        area,
    );

    for group in IconGroupId::ALL {
        let spec = icon_group_spec(group);
        let Some(row) = doc.rect(&clickable_id(group)).and_then(|r| cells(r, area)) else {
            continue;
        };
        let selected = doc.has_class(spec.desktop_icon_id, "selected");
        let label = spec
            .label
            .and_then(|l| doc.text(l.desktop_id))
            .unwrap_or_else(|| group.as_str().to_string());
        let style = if selected {
            theme.selected_style()
        } else {
            Style::default().fg(theme.text_dim)
        };
        frame.render_widget(
            Paragraph::new(format!(" {} {}", glyph(group), label)).style(style),
            row,
        );
    }

    let indicator_top = preview
        .document()
        .style_property(SIDEBAR_ID, "--indicator-top")
        .and_then(|v| parse_px(&v));
    if let Some(top) = indicator_top {
        let rect = Rect::new(f64::from(area.x), f64::from(area.y) + top, 1.0, 1.0);
        if let Some(cell) = cells(rect, area) {
            frame.render_widget(Paragraph::new("▌").style(theme.indicator_style()), cell);
        }
    }
}

fn render_content(frame: &mut Frame, preview: &Preview, area: Area) {
    let theme = preview.theme();
    let doc = preview.document();

    let visible: Vec<SectionId> = SectionId::ALL
        .into_iter()
        .filter(|s| doc.has_class(container_id(*s), "visible"))
        .collect();

    let (title, body) = match visible.as_slice() {
        [] => (" (no section visible) ".to_string(), String::new()),
        [section] => (
            format!(" {} ", site::page_title(*section)),
            doc.text(container_id(*section)).unwrap_or_default(),
        ),
        many => (
            format!(" {} sections visible ", many.len()),
            String::new(),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(title, Style::default().fg(theme.heading)));
    frame.render_widget(
        Paragraph::new(body).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame, preview: &Preview, screen: Area) {
    let theme = preview.theme();
    let doc = preview.document();
    let Some(bar) = doc.rect(BOTTOM_BAR_ID).and_then(|r| cells(r, screen)) else {
        return;
    };
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_surface)), bar);

    for group in IconGroupId::ALL {
        let spec = icon_group_spec(group);
        let Some(item) = doc.rect(spec.mobile_icon_id).and_then(|r| cells(r, bar)) else {
            continue;
        };
        let selected = doc.has_class(spec.mobile_icon_id, "selected");
        let text = if selected {
            format!(" {} {}", glyph(group), group.as_str())
        } else {
            format!(" {}", glyph(group))
        };
        let style = if selected {
            theme.selected_style()
        } else {
            Style::default().fg(theme.text_dim).bg(theme.bg_surface)
        };
        let row = Area::new(item.x, item.y + item.height / 2, item.width, 1);
        frame.render_widget(Paragraph::new(text).style(style), row);
    }

    let left = doc
        .style_property(BOTTOM_BAR_ID, "--indicator-left")
        .and_then(|v| parse_px(&v));
    let width = doc
        .style_property(BOTTOM_BAR_ID, "--indicator-width")
        .and_then(|v| parse_px(&v));
    if let (Some(left), Some(width)) = (left, width) {
        let rect = Rect::new(
            f64::from(bar.x) + left,
            f64::from(bar.y + bar.height.saturating_sub(1)),
            width,
            1.0,
        );
        if let Some(line) = cells(rect, bar) {
            let fill = "━".repeat(usize::from(line.width));
            frame.render_widget(Paragraph::new(fill).style(theme.indicator_style()), line);
        }
    }
}

fn render_status(frame: &mut Frame, preview: &Preview, area: Area) {
    let theme = preview.theme();
    let navigator = preview.navigator();
    let runtime = preview.runtime();

    let phase = match navigator.state().phase() {
        Phase::Idle => Span::styled("idle", Style::default().fg(theme.success)),
        Phase::Transitioning(section) => Span::styled(
            format!("→ {}", section),
            Style::default().fg(theme.warning),
        ),
    };
    let queued = navigator
        .state()
        .queued()
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    let fonts = match runtime.fonts() {
        FontStatus::Unsupported => "n/a",
        FontStatus::Loading => "loading",
        FontStatus::Ready => "ready",
    };

    let line = Line::from(vec![
        Span::raw(" "),
        phase,
        Span::raw(format!(
            "  queued {}  t={}ms  fonts {}  tab {}  ",
            queued,
            runtime.now().as_millis(),
            fonts,
            if preview.tab_visible() { "visible" } else { "hidden" },
        )),
        Span::styled(KEY_HINTS, theme.hint_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_menu(frame: &mut Frame, preview: &Preview, content: Area) {
    let theme = preview.theme();
    let doc = preview.document();
    if !doc.has_class(PANEL_ID, "visible") {
        return;
    }

    let width = 20.min(content.width);
    let height = (SectionId::menu_order().len() as u16 + 2).min(content.height);
    let area = Area::new(content.right().saturating_sub(width), content.y, width, height);
    let closing = doc.has_class(PANEL_ID, "hiding");

    let lines: Vec<Line> = SectionId::menu_order()
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if preview.navigator().active_section().map(|s| s.icon_group())
                == Some(section.icon_group())
            {
                theme.selected_style()
            } else {
                Style::default().fg(theme.text)
            };
            Line::styled(format!(" {} {}", i + 1, site::page_title(section)), style)
        })
        .collect();

    let border = if closing {
        Style::default().fg(theme.text_dim)
    } else {
        Style::default().fg(theme.accent)
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" menu ")
                .style(Style::default().bg(theme.bg_overlay)),
        ),
        area,
    );
}
