use anyhow::{Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use std::fmt::Write;
use tiny_skia::{Pixmap, Transform};

use crate::*;

const AXIS_COLOR: &str = "#0ea5e9";
const STEM_COLOR: &str = "#7dd3fc";
const LEADER_COLOR: &str = "#bae6fd";
const SUB_AXIS_DOT_COLOR: &str = "#38bdf8";
const EMOTION_DOT_STROKE: &str = "#e0f2fe";
const DATE_STROKE: &str = "#38bdf8";
const DATE_TEXT: &str = "#0284c7";
const TITLE_COLOR: &str = "#334155";
const LABEL_TEXT: &str = "#64748b";
const LABEL_FILL: &str = "#f8fafc";
const LABEL_STROKE: &str = "#e2e8f0";
const CARD_STROKE: &str = "#e2e8f0";
const START_COLOR: &str = "#0284c7";
const END_COLOR: &str = "#14b8a6";
const END_TEXT: &str = "#0d9488";
const NAME_COLOR: &str = "#1e293b";
const ROLE_COLOR: &str = "#64748b";
const WARNING_SWATCH: &str = "#ef4444";

const PILL_CHAR_WIDTH: f32 = 6.2;
const PILL_HEIGHT: f32 = 18.0;
const PILL_PADDING: f32 = 8.0;

impl Journey {
    pub fn render_svg(&self, mode: Mode, background: &str) -> Result<String> {
        let plan = plan(self, mode);
        self.render_svg_plan(&plan, background)
    }

    pub fn render_svg_plan(&self, plan: &PlacementPlan, background: &str) -> Result<String> {
        let geometry = plan.geometry();
        let canvas = plan.canvas();

        let mut svg = String::new();
        write!(
            svg,
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="Inter, system-ui, sans-serif" data-mode="{}">
  <defs>
"##,
            canvas.width,
            canvas.height,
            canvas.width,
            canvas.height,
            plan.mode.as_str(),
        )?;

        let avatar_center = geometry.project(plan.start.center);
        let avatar_clip = svg_safe_id("journeymap-avatar-", &self.customer.id);
        write!(
            svg,
            "    <clipPath id=\"{}\">\n      <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" />\n    </clipPath>\n",
            avatar_clip,
            avatar_center.x,
            avatar_center.y,
            AVATAR_RADIUS - 4.0,
        )?;
        write!(
            svg,
            "  </defs>\n  <rect width=\"100%\" height=\"100%\" fill=\"{}\" />\n",
            escape_xml(background)
        )?;

        for (index, segment) in plan.axis_segments.iter().enumerate() {
            let from = geometry.project(segment.from);
            let to = geometry.project(segment.to);
            let is_tail = index + 1 == plan.axis_segments.len();
            let opacity_attr = if is_tail { " stroke-opacity=\"0.75\"" } else { "" };
            write!(
                svg,
                "  <line class=\"axis\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.0}\"{} />\n",
                from.x, from.y, to.x, to.y, AXIS_COLOR, AXIS_WIDTH, opacity_attr
            )?;
        }

        for (stage, placement) in self.stages().iter().zip(&plan.stages) {
            render_stage(&mut svg, stage, placement, geometry.as_ref())?;
        }

        self.render_start_anchor(&mut svg, plan, geometry.as_ref(), &avatar_clip)?;
        self.render_end_anchor(&mut svg, plan, geometry.as_ref())?;
        render_legend(&mut svg, canvas)?;

        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn render_start_anchor(
        &self,
        svg: &mut String,
        plan: &PlacementPlan,
        geometry: &dyn AxisGeometry,
        avatar_clip: &str,
    ) -> Result<()> {
        let center = geometry.project(plan.start.center);
        let customer = &self.customer;

        write!(svg, "  <g class=\"anchor\" data-role=\"start\">\n")?;
        write!(
            svg,
            "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"white\" stroke=\"#e0f2fe\" stroke-width=\"4\" />\n",
            center.x, center.y, AVATAR_RADIUS
        )?;

        match &customer.avatar {
            Avatar::Remote { url } => {
                render_avatar_image(svg, center, url, avatar_clip)?;
            }
            Avatar::Inline { mime_type, data } => {
                let encoded = BASE64_STANDARD.encode(data);
                let data_uri = format!("data:{};base64,{}", mime_type, encoded);
                render_avatar_image(svg, center, &data_uri, avatar_clip)?;
            }
        }

        let badge = geometry.project(FlowPoint::new(
            plan.start.center.flow,
            AVATAR_RADIUS + 6.0,
        ));
        render_badge(svg, badge, "START", START_COLOR)?;

        let name = geometry.project(FlowPoint::new(
            plan.start.center.flow,
            AVATAR_RADIUS + 28.0,
        ));
        write!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"15\" font-weight=\"800\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            name.x,
            name.y,
            NAME_COLOR,
            escape_xml(&customer.name.to_uppercase())
        )?;

        let role = geometry.project(FlowPoint::new(
            plan.start.center.flow,
            AVATAR_RADIUS + 46.0,
        ));
        write!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"10\" font-weight=\"500\" letter-spacing=\"1.5\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            role.x,
            role.y,
            ROLE_COLOR,
            escape_xml(&customer.role.to_uppercase())
        )?;

        svg.push_str("  </g>\n");
        Ok(())
    }

    fn render_end_anchor(
        &self,
        svg: &mut String,
        plan: &PlacementPlan,
        geometry: &dyn AxisGeometry,
    ) -> Result<()> {
        let center = geometry.project(plan.end.center);

        write!(svg, "  <g class=\"anchor\" data-role=\"end\">\n")?;
        write!(
            svg,
            "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"white\" stroke-width=\"4\" />\n",
            center.x, center.y, STATUS_DISC_RADIUS, END_COLOR
        )?;
        write!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"white\" font-size=\"24\" text-anchor=\"middle\" dominant-baseline=\"central\">\u{263A}</text>\n",
            center.x, center.y
        )?;

        let status = geometry.project(FlowPoint::new(
            plan.end.center.flow,
            STATUS_DISC_RADIUS + 22.0,
        ));
        write!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"13\" font-weight=\"800\" letter-spacing=\"1\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            status.x,
            status.y,
            END_TEXT,
            escape_xml(&self.customer.status.to_uppercase())
        )?;

        svg.push_str("  </g>\n");
        Ok(())
    }

    pub fn render_png(&self, mode: Mode, background: &str, scale: f32) -> Result<Vec<u8>> {
        if scale <= 0.0 {
            bail!("scale must be greater than zero when rendering PNG output");
        }

        let svg = self.render_svg(mode, background)?;

        let mut options = resvg::usvg::Options::default();
        options.font_family = "Inter".to_string();
        options.fontdb_mut().load_system_fonts();

        let tree = resvg::usvg::Tree::from_str(&svg, &options)
            .map_err(|err| anyhow!("failed to parse generated SVG for PNG export: {err}"))?;

        let size = tree.size().to_int_size();
        let scaled_width = ((size.width() as f32) * scale).ceil();
        let scaled_height = ((size.height() as f32) * scale).ceil();

        if !scaled_width.is_finite() || !scaled_height.is_finite() {
            bail!("scaled dimensions are not finite; try a smaller scale factor");
        }
        if scaled_width < 1.0 || scaled_height < 1.0 {
            bail!("scaled dimensions collapsed below 1px; try a larger scale factor");
        }
        if scaled_width > u32::MAX as f32 || scaled_height > u32::MAX as f32 {
            bail!("scaled dimensions exceed supported limits; try a smaller scale factor");
        }

        let scaled_width = scaled_width as u32;
        let scaled_height = scaled_height as u32;

        let mut pixmap = Pixmap::new(scaled_width, scaled_height).ok_or_else(|| {
            anyhow!("failed to allocate {scaled_width}x{scaled_height} surface for PNG export")
        })?;

        let transform = Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let png_data = pixmap
            .encode_png()
            .map_err(|err| anyhow!("failed to encode PNG output: {err}"))?;

        Ok(png_data)
    }
}

fn render_stage(
    svg: &mut String,
    stage: &JourneyStage,
    placement: &StagePlacement,
    geometry: &dyn AxisGeometry,
) -> Result<()> {
    write!(
        svg,
        "  <g class=\"stage\" data-id=\"{}\" data-side=\"{}\">\n",
        escape_xml(&stage.id),
        placement.side.label(geometry.mode())
    )?;

    let stem_root = geometry.project(placement.stem.root);
    let stem_tip = geometry.project(placement.stem.tip);
    write!(
        svg,
        "    <line class=\"stem\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.0}\" />\n",
        stem_root.x, stem_root.y, stem_tip.x, stem_tip.y, STEM_COLOR, STEM_WIDTH
    )?;

    let sub_from = geometry.project(placement.stem.sub_axis.from);
    let sub_to = geometry.project(placement.stem.sub_axis.to);
    write!(
        svg,
        "    <line class=\"sub-axis\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.0}\" />\n",
        sub_from.x, sub_from.y, sub_to.x, sub_to.y, STEM_COLOR, STEM_WIDTH
    )?;

    for (touchpoint, card) in stage.touchpoints.iter().zip(&placement.touchpoints) {
        render_touchpoint(svg, touchpoint, card, placement, geometry)?;
    }

    let dot = geometry.project(placement.dot);
    write!(
        svg,
        "    <circle class=\"emotion-dot\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.0}\" fill=\"white\" stroke=\"{}\" stroke-width=\"2\" />\n    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"20\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
        dot.x,
        dot.y,
        EMOTION_DOT_RADIUS,
        EMOTION_DOT_STROKE,
        dot.x,
        dot.y,
        stage.emotion.glyph()
    )?;

    let label_center = geometry.project(placement.emotion_label);
    render_pill(
        svg,
        label_center,
        stage.emotion.label(),
        LABEL_FILL,
        LABEL_STROKE,
        LABEL_TEXT,
    )?;

    let date_center = geometry.project(placement.date);
    render_pill(svg, date_center, &stage.date, "white", DATE_STROKE, DATE_TEXT)?;

    let title_center = geometry.project(placement.title);
    write!(
        svg,
        "    <text class=\"stage-title\" x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"12\" font-weight=\"800\" letter-spacing=\"1\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
        title_center.x,
        title_center.y,
        TITLE_COLOR,
        escape_xml(&format!("{}. {}", stage.order, stage.name.to_uppercase()))
    )?;

    svg.push_str("  </g>\n");
    Ok(())
}

fn render_touchpoint(
    svg: &mut String,
    touchpoint: &Touchpoint,
    card: &TouchpointPlacement,
    placement: &StagePlacement,
    geometry: &dyn AxisGeometry,
) -> Result<()> {
    let style = touchpoint.style_class();

    let dot = geometry.project(card.dot);
    write!(
        svg,
        "    <circle class=\"card-dot\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.0}\" fill=\"{}\" />\n",
        dot.x, dot.y, SUB_AXIS_DOT_RADIUS, SUB_AXIS_DOT_COLOR
    )?;

    let leader_from = geometry.project(card.leader.from);
    let leader_to = geometry.project(card.leader.to);
    write!(
        svg,
        "    <line class=\"leader\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.0}\" />\n",
        leader_from.x, leader_from.y, leader_to.x, leader_to.y, LEADER_COLOR, LEADER_WIDTH
    )?;

    let (flow_extent, cross_extent) = match geometry.mode() {
        Mode::Horizontal => (CARD_WIDTH, CARD_HEIGHT),
        Mode::Vertical => (CARD_HEIGHT, CARD_WIDTH),
    };
    let cross_dir = (card.anchor.cross - placement.stem.tip.cross).signum();
    let far_corner = FlowPoint::new(
        card.anchor.flow + flow_extent,
        card.anchor.cross + cross_dir * cross_extent,
    );
    let (x, y, width, height) = project_rect(geometry, card.anchor, far_corner);

    write!(
        svg,
        "    <g class=\"card\" data-id=\"{}\" data-style=\"{}\" data-icon=\"{}\">\n",
        escape_xml(&touchpoint.id),
        style.as_str(),
        touchpoint.kind.icon().identifier()
    )?;
    write!(
        svg,
        "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"12\" fill=\"white\" fill-opacity=\"0.9\" stroke=\"{}\" />\n",
        x, y, width, height, CARD_STROKE
    )?;
    write!(
        svg,
        "      <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"11\" fill=\"{}\" stroke=\"{}\" />\n      <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"11\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
        x + 20.0,
        y + 20.0,
        style.bubble_fill(),
        style.bubble_stroke(),
        x + 20.0,
        y + 20.0,
        style.icon_color(),
        touchpoint.kind.icon().glyph()
    )?;
    write!(
        svg,
        "      <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"11\" font-weight=\"700\" dominant-baseline=\"middle\">{}</text>\n",
        x + 38.0,
        y + 16.0,
        style.title_color(),
        escape_xml(&touchpoint.title)
    )?;
    if let Some(description) = &touchpoint.description {
        write!(
            svg,
            "      <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"9\" dominant-baseline=\"middle\">{}</text>\n",
            x + 38.0,
            y + 16.0 + CARD_TEXT_LINE_HEIGHT,
            style.description_color(),
            escape_xml(description)
        )?;
    }
    svg.push_str("    </g>\n");
    Ok(())
}

fn render_pill(
    svg: &mut String,
    center: Point,
    text: &str,
    fill: &str,
    stroke: &str,
    text_color: &str,
) -> Result<()> {
    let width = text.chars().count() as f32 * PILL_CHAR_WIDTH + PILL_PADDING * 2.0;
    write!(
        svg,
        "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{:.1}\" fill=\"{}\" stroke=\"{}\" />\n    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"10\" font-weight=\"700\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
        center.x - width / 2.0,
        center.y - PILL_HEIGHT / 2.0,
        width,
        PILL_HEIGHT,
        PILL_HEIGHT / 2.0,
        fill,
        stroke,
        center.x,
        center.y,
        text_color,
        escape_xml(text)
    )?;
    Ok(())
}

fn render_badge(svg: &mut String, center: Point, text: &str, fill: &str) -> Result<()> {
    let width = text.chars().count() as f32 * PILL_CHAR_WIDTH + PILL_PADDING * 2.0;
    write!(
        svg,
        "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{:.1}\" fill=\"{}\" />\n    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"white\" font-size=\"9\" font-weight=\"800\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
        center.x - width / 2.0,
        center.y - PILL_HEIGHT / 2.0,
        width,
        PILL_HEIGHT,
        PILL_HEIGHT / 2.0,
        fill,
        center.x,
        center.y,
        escape_xml(text)
    )?;
    Ok(())
}

fn render_avatar_image(svg: &mut String, center: Point, href: &str, clip_id: &str) -> Result<()> {
    let inset = AVATAR_RADIUS - 4.0;
    write!(
        svg,
        "    <image x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" href=\"{}\" xlink:href=\"{}\" clip-path=\"url(#{})\" preserveAspectRatio=\"xMidYMid slice\" />\n",
        center.x - inset,
        center.y - inset,
        inset * 2.0,
        inset * 2.0,
        escape_xml(href),
        escape_xml(href),
        clip_id
    )?;
    Ok(())
}

fn render_legend(svg: &mut String, canvas: CanvasSize) -> Result<()> {
    let entries = [
        (AXIS_COLOR, "Positive"),
        (WARNING_SWATCH, "Issues"),
        (END_COLOR, "Result"),
    ];
    let y = canvas.height - 28.0;
    let mut x = 32.0;

    write!(svg, "  <g class=\"legend\" font-size=\"10\">\n")?;
    for (color, label) in entries {
        write!(
            svg,
            "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"{}\" />\n    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-weight=\"500\" dominant-baseline=\"middle\">{}</text>\n",
            x, y, color, x + 10.0, y, LABEL_TEXT, label
        )?;
        x += 12.0 + label.len() as f32 * PILL_CHAR_WIDTH + 24.0;
    }
    svg.push_str("  </g>\n");
    Ok(())
}

fn project_rect(geometry: &dyn AxisGeometry, a: FlowPoint, b: FlowPoint) -> (f32, f32, f32, f32) {
    let pa = geometry.project(a);
    let pb = geometry.project(b);
    (
        pa.x.min(pb.x),
        pa.y.min(pb.y),
        (pa.x - pb.x).abs(),
        (pa.y - pb.y).abs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_declares_mode_and_canvas() {
        let journey = Journey::sample();
        let svg = journey.render_svg(Mode::Horizontal, "#f8fafc").unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("data-mode=\"horizontal\""));
        assert!(svg.trim_end().ends_with("</svg>"));

        let vertical = journey.render_svg(Mode::Vertical, "#f8fafc").unwrap();
        assert!(vertical.contains("data-mode=\"vertical\""));
    }

    #[test]
    fn renders_one_stage_group_per_stage_in_order() {
        let journey = Journey::sample();
        let svg = journey.render_svg(Mode::Horizontal, "white").unwrap();
        for stage in journey.stages() {
            assert!(svg.contains(&format!("data-id=\"{}\"", stage.id)));
        }
        let s1 = svg.find("data-id=\"s1\"").unwrap();
        let s5 = svg.find("data-id=\"s5\"").unwrap();
        assert!(s1 < s5);
        assert_eq!(svg.matches("class=\"stage\"").count(), 5);
    }

    #[test]
    fn stage_groups_carry_alternating_sides() {
        let journey = Journey::sample();
        let svg = journey.render_svg(Mode::Horizontal, "white").unwrap();
        let tops = svg.matches("data-side=\"top\"").count();
        let bottoms = svg.matches("data-side=\"bottom\"").count();
        assert_eq!((tops, bottoms), (3, 2));

        let svg = journey.render_svg(Mode::Vertical, "white").unwrap();
        let lefts = svg.matches("data-side=\"left\"").count();
        let rights = svg.matches("data-side=\"right\"").count();
        assert_eq!((lefts, rights), (3, 2));
    }

    #[test]
    fn empty_journey_renders_anchors_and_single_axis_segment() {
        let journey = Journey::new(Journey::sample().customer, Vec::new());
        let svg = journey.render_svg(Mode::Horizontal, "white").unwrap();
        assert_eq!(svg.matches("class=\"axis\"").count(), 1);
        assert!(svg.contains("data-role=\"start\""));
        assert!(svg.contains("data-role=\"end\""));
        assert_eq!(svg.matches("class=\"stage\"").count(), 0);
    }

    #[test]
    fn warning_card_renders_warning_treatment() {
        let journey = Journey::sample();
        let svg = journey.render_svg(Mode::Horizontal, "white").unwrap();
        let card = svg
            .split("<g class=\"card\"")
            .find(|chunk| chunk.contains("data-id=\"t2-2\""))
            .unwrap();
        assert!(card.contains("data-style=\"warning\""));
        assert!(card.contains(StyleClass::Warning.icon_color()));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut journey = Journey::sample();
        journey.customer.status = "<&\">".to_string();
        let svg = journey.render_svg(Mode::Horizontal, "white").unwrap();
        assert!(!svg.contains("<&\">"));
        assert!(svg.contains("&lt;&amp;&quot;&gt;"));
    }

    #[test]
    fn toggled_round_trip_is_byte_identical() {
        let journey = Journey::sample();
        let mode = Mode::Vertical;
        let original = journey.render_svg(mode, "white").unwrap();
        let round_trip = journey
            .render_svg(mode.toggled().toggled(), "white")
            .unwrap();
        assert_eq!(original, round_trip);
    }

    #[test]
    fn modes_render_equal_element_counts() {
        let journey = Journey::sample();
        let horizontal = journey.render_svg(Mode::Horizontal, "white").unwrap();
        let vertical = journey.render_svg(Mode::Vertical, "white").unwrap();
        for marker in [
            "class=\"stage\"",
            "class=\"card\"",
            "class=\"stem\"",
            "class=\"axis\"",
            "class=\"card-dot\"",
        ] {
            assert_eq!(
                horizontal.matches(marker).count(),
                vertical.matches(marker).count(),
                "count mismatch for {marker}"
            );
        }
    }
}
