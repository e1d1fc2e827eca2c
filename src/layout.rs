use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Primary,
    Secondary,
}

impl Side {
    pub fn for_index(index: usize) -> Side {
        if index % 2 == 0 {
            Side::Primary
        } else {
            Side::Secondary
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Primary => Side::Secondary,
            Side::Secondary => Side::Primary,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Side::Primary => -1.0,
            Side::Secondary => 1.0,
        }
    }

    pub fn label(self, mode: Mode) -> &'static str {
        match (mode, self) {
            (Mode::Horizontal, Side::Primary) => "top",
            (Mode::Horizontal, Side::Secondary) => "bottom",
            (Mode::Vertical, Side::Primary) => "left",
            (Mode::Vertical, Side::Secondary) => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Outward,
    Inward,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowPoint {
    pub flow: f32,
    pub cross: f32,
}

impl FlowPoint {
    pub fn new(flow: f32, cross: f32) -> Self {
        Self { flow, cross }
    }

    pub fn on_axis(flow: f32) -> Self {
        Self { flow, cross: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSegment {
    pub from: FlowPoint,
    pub to: FlowPoint,
}

impl FlowSegment {
    pub fn new(from: FlowPoint, to: FlowPoint) -> Self {
        Self { from, to }
    }
}

pub trait AxisGeometry {
    fn mode(&self) -> Mode;
    fn project(&self, point: FlowPoint) -> Point;
    fn canvas(&self, flow_extent: f32, cross_extent: f32) -> CanvasSize;
}

pub struct HorizontalAxis {
    pub axis_cross: f32,
}

impl AxisGeometry for HorizontalAxis {
    fn mode(&self) -> Mode {
        Mode::Horizontal
    }

    fn project(&self, point: FlowPoint) -> Point {
        Point::new(point.flow, self.axis_cross + point.cross)
    }

    fn canvas(&self, flow_extent: f32, cross_extent: f32) -> CanvasSize {
        CanvasSize {
            width: flow_extent,
            height: cross_extent,
        }
    }
}

pub struct VerticalAxis {
    pub axis_cross: f32,
}

impl AxisGeometry for VerticalAxis {
    fn mode(&self) -> Mode {
        Mode::Vertical
    }

    fn project(&self, point: FlowPoint) -> Point {
        Point::new(self.axis_cross + point.cross, point.flow)
    }

    fn canvas(&self, flow_extent: f32, cross_extent: f32) -> CanvasSize {
        CanvasSize {
            width: cross_extent,
            height: flow_extent,
        }
    }
}

pub fn axis_geometry(mode: Mode, axis_cross: f32) -> Box<dyn AxisGeometry> {
    match mode {
        Mode::Horizontal => Box::new(HorizontalAxis { axis_cross }),
        Mode::Vertical => Box::new(VerticalAxis { axis_cross }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPlacement {
    pub flow_start: f32,
    pub span: f32,
    pub center: FlowPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemGeometry {
    pub root: FlowPoint,
    pub tip: FlowPoint,
    pub sub_axis: FlowSegment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchpointPlacement {
    pub index: usize,
    pub lane: Lane,
    pub anchor: FlowPoint,
    pub dot: FlowPoint,
    pub leader: FlowSegment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagePlacement {
    pub index: usize,
    pub side: Side,
    pub flow_start: f32,
    pub compaction: f32,
    pub dot: FlowPoint,
    pub emotion_label: FlowPoint,
    pub stem: StemGeometry,
    pub date: FlowPoint,
    pub title: FlowPoint,
    pub touchpoints: Vec<TouchpointPlacement>,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub mode: Mode,
    pub start: AnchorPlacement,
    pub end: AnchorPlacement,
    pub stages: Vec<StagePlacement>,
    pub axis_segments: Vec<FlowSegment>,
    pub flow_extent: f32,
    pub cross_extent: f32,
}

impl PlacementPlan {
    pub fn canvas(&self) -> CanvasSize {
        self.geometry().canvas(self.flow_extent, self.cross_extent)
    }

    pub fn geometry(&self) -> Box<dyn AxisGeometry> {
        axis_geometry(self.mode, self.cross_extent / 2.0)
    }
}

pub fn plan(journey: &Journey, mode: Mode) -> PlacementPlan {
    plan_with_metrics(journey, mode, mode.metrics())
}

pub fn plan_with_metrics(journey: &Journey, mode: Mode, metrics: LayoutMetrics) -> PlacementPlan {
    let stages = journey.stages();
    let mut cursor = LAYOUT_MARGIN;

    let start = AnchorPlacement {
        flow_start: cursor,
        span: ANCHOR_SPAN,
        center: FlowPoint::on_axis(cursor + ANCHOR_SPAN / 2.0),
    };
    cursor += ANCHOR_SPAN;

    let mut placements = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        let compaction = if index == 0 { 0.0 } else { -metrics.compaction };
        let flow_start = cursor + compaction;
        let side = Side::for_index(index);
        let is_last = index + 1 == stages.len();

        let dot = FlowPoint::on_axis(flow_start + metrics.dot_inset);
        let tip_cross = side.sign() * metrics.stem_length;
        let tip = FlowPoint::new(dot.flow, tip_cross);
        let sub_axis_end = match mode {
            Mode::Horizontal => flow_start + metrics.stage_span * 0.9,
            Mode::Vertical => flow_start + metrics.stage_span,
        };
        let stem = StemGeometry {
            root: dot,
            tip,
            sub_axis: FlowSegment::new(tip, FlowPoint::new(sub_axis_end, tip_cross)),
        };

        let date = FlowPoint::new(dot.flow, side.sign() * metrics.stem_length / 2.0);
        let title = match mode {
            Mode::Horizontal => FlowPoint::new(
                dot.flow,
                side.sign() * (metrics.stem_length + 8.0 + TITLE_LINE_HEIGHT),
            ),
            Mode::Vertical => FlowPoint::new(dot.flow - 30.0, side.sign() * 16.0),
        };
        let emotion_label = FlowPoint::new(dot.flow, side.opposite().sign() * EMOTION_LABEL_GAP);

        let touchpoints = place_touchpoints(stage, mode, side, flow_start, tip_cross, metrics);

        placements.push(StagePlacement {
            index,
            side,
            flow_start,
            compaction,
            dot,
            emotion_label,
            stem,
            date,
            title,
            touchpoints,
            is_last,
        });

        cursor = flow_start + metrics.stage_span;
    }

    let end_flow_start = cursor - metrics.end_pull;
    let end = AnchorPlacement {
        flow_start: end_flow_start,
        span: ANCHOR_SPAN,
        center: FlowPoint::on_axis(end_flow_start + ANCHOR_SPAN / 2.0),
    };
    cursor = end_flow_start + ANCHOR_SPAN + TRAILING_PAD;

    let mut axis_points = Vec::with_capacity(placements.len() + 2);
    axis_points.push(start.center);
    for placement in &placements {
        axis_points.push(placement.dot);
    }
    axis_points.push(end.center);
    let axis_segments = axis_points
        .windows(2)
        .map(|pair| FlowSegment::new(pair[0], pair[1]))
        .collect();

    PlacementPlan {
        mode,
        start,
        end,
        stages: placements,
        axis_segments,
        flow_extent: cursor + LAYOUT_MARGIN,
        cross_extent: metrics.stage_breadth,
    }
}

fn place_touchpoints(
    stage: &JourneyStage,
    mode: Mode,
    side: Side,
    flow_start: f32,
    tip_cross: f32,
    metrics: LayoutMetrics,
) -> Vec<TouchpointPlacement> {
    let mut placements = Vec::with_capacity(stage.touchpoints.len());

    match mode {
        Mode::Horizontal => {
            let step = CARD_WIDTH - CARD_OVERLAP_H;
            for index in 0..stage.touchpoints.len() {
                let card_flow = flow_start + CARD_ROW_INSET + index as f32 * step;
                let lane = if index % 2 == 0 {
                    Lane::Outward
                } else {
                    Lane::Inward
                };
                let lane_dir = match lane {
                    Lane::Outward => side.sign(),
                    Lane::Inward | Lane::Stacked => -side.sign(),
                };
                let dot = FlowPoint::new(card_flow + 28.0, tip_cross);
                let card_cross = tip_cross + lane_dir * metrics.card_leader;
                let anchor = FlowPoint::new(card_flow, card_cross);
                placements.push(TouchpointPlacement {
                    index,
                    lane,
                    anchor,
                    dot,
                    leader: FlowSegment::new(dot, FlowPoint::new(dot.flow, card_cross)),
                });
            }
        }
        Mode::Vertical => {
            let step = CARD_HEIGHT + CARD_GAP_V;
            for index in 0..stage.touchpoints.len() {
                let card_flow = flow_start + CARD_STACK_INSET + index as f32 * step;
                let mid_flow = card_flow + CARD_HEIGHT / 2.0;
                let dot = FlowPoint::new(mid_flow, tip_cross);
                let card_cross = tip_cross + side.sign() * metrics.card_leader;
                placements.push(TouchpointPlacement {
                    index,
                    lane: Lane::Stacked,
                    anchor: FlowPoint::new(card_flow, card_cross),
                    dot,
                    leader: FlowSegment::new(dot, FlowPoint::new(mid_flow, card_cross)),
                });
            }
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan(mode: Mode) -> PlacementPlan {
        plan(&Journey::sample(), mode)
    }

    #[test]
    fn side_assignment_alternates_with_period_two() {
        for index in 0..64 {
            assert_eq!(Side::for_index(index), Side::for_index(index + 2));
            assert_ne!(Side::for_index(index), Side::for_index(index + 1));
        }
        assert_eq!(Side::for_index(0), Side::Primary);
    }

    #[test]
    fn five_stage_scenario_assigns_expected_sides() {
        let horizontal = sample_plan(Mode::Horizontal);
        let sides: Vec<&str> = horizontal
            .stages
            .iter()
            .map(|s| s.side.label(Mode::Horizontal))
            .collect();
        assert_eq!(sides, vec!["top", "bottom", "top", "bottom", "top"]);

        let vertical = sample_plan(Mode::Vertical);
        let sides: Vec<&str> = vertical
            .stages
            .iter()
            .map(|s| s.side.label(Mode::Vertical))
            .collect();
        assert_eq!(sides, vec!["left", "right", "left", "right", "left"]);
    }

    #[test]
    fn first_stage_has_zero_compaction_and_rest_are_constant() {
        for mode in [Mode::Horizontal, Mode::Vertical] {
            let plan = sample_plan(mode);
            let expected = -mode.metrics().compaction;
            assert_eq!(plan.stages[0].compaction, 0.0);
            for placement in &plan.stages[1..] {
                assert_eq!(placement.compaction, expected, "mode {mode:?}");
            }
        }
    }

    #[test]
    fn stage_order_follows_order_field_not_input_order() {
        let sample = Journey::sample();
        let mut reversed: Vec<JourneyStage> = sample.stages().to_vec();
        reversed.reverse();
        let journey = Journey::new(sample.customer.clone(), reversed);

        let plan = plan(&journey, Mode::Horizontal);
        let dots: Vec<f32> = plan.stages.iter().map(|s| s.dot.flow).collect();
        let mut sorted = dots.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(dots, sorted);

        let names: Vec<&str> = journey.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["AWARENESS", "CONSIDERATION", "DECISION", "DELIVERY", "LOYALTY"]
        );
    }

    #[test]
    fn empty_journey_keeps_anchors_and_one_segment() {
        let journey = Journey::new(Journey::sample().customer, Vec::new());
        for mode in [Mode::Horizontal, Mode::Vertical] {
            let plan = plan(&journey, mode);
            assert!(plan.stages.is_empty());
            assert_eq!(plan.axis_segments.len(), 1);
            assert_eq!(plan.axis_segments[0].from, plan.start.center);
            assert_eq!(plan.axis_segments[0].to, plan.end.center);
            assert!(plan.end.center.flow > plan.start.center.flow);
        }
    }

    #[test]
    fn stage_without_touchpoints_keeps_stem_decoration() {
        let sample = Journey::sample();
        let mut stages = sample.stages().to_vec();
        stages[2].touchpoints.clear();
        let journey = Journey::new(sample.customer.clone(), stages);

        let plan = plan(&journey, Mode::Vertical);
        let bare = &plan.stages[2];
        assert!(bare.touchpoints.is_empty());
        assert_eq!(bare.stem.root, bare.dot);
        assert_ne!(bare.stem.tip.cross, 0.0);
    }

    #[test]
    fn horizontal_touchpoints_alternate_outward_inward() {
        let plan = sample_plan(Mode::Horizontal);
        let first = &plan.stages[0];
        assert_eq!(first.touchpoints[0].lane, Lane::Outward);
        assert_eq!(first.touchpoints[1].lane, Lane::Inward);

        let tip = first.stem.tip.cross;
        let outward = first.touchpoints[0].anchor.cross;
        let inward = first.touchpoints[1].anchor.cross;
        assert!(outward.abs() > tip.abs(), "outward card sits past the stem tip");
        assert!(inward.abs() < tip.abs(), "inward card sits between tip and axis");
    }

    #[test]
    fn vertical_touchpoints_stack_on_one_side() {
        let plan = sample_plan(Mode::Vertical);
        let first = &plan.stages[0];
        assert!(first.touchpoints.len() >= 2);
        let cross = first.touchpoints[0].anchor.cross;
        for placement in &first.touchpoints {
            assert_eq!(placement.lane, Lane::Stacked);
            assert_eq!(placement.anchor.cross, cross);
        }
        assert!(
            first.touchpoints[1].anchor.flow > first.touchpoints[0].anchor.flow,
            "stacked cards advance along the flow axis"
        );
    }

    #[test]
    fn anchors_stay_outside_parity_sequence() {
        let plan = sample_plan(Mode::Horizontal);
        assert_eq!(plan.start.center.cross, 0.0);
        assert_eq!(plan.end.center.cross, 0.0);
        assert!(plan.start.center.flow < plan.stages[0].dot.flow);
        assert!(plan.end.center.flow > plan.stages.last().unwrap().dot.flow);
        assert_eq!(plan.axis_segments.len(), plan.stages.len() + 1);
    }

    #[test]
    fn axis_strategies_are_transposes() {
        let horizontal = HorizontalAxis { axis_cross: 300.0 };
        let vertical = VerticalAxis { axis_cross: 300.0 };
        let samples = [
            FlowPoint::new(0.0, 0.0),
            FlowPoint::new(140.0, -96.0),
            FlowPoint::new(512.5, 41.25),
        ];
        for point in samples {
            let h = horizontal.project(point);
            let v = vertical.project(point);
            assert_eq!(h.x, v.y);
            assert_eq!(h.y, v.x);
        }

        let h_canvas = horizontal.canvas(2000.0, 600.0);
        let v_canvas = vertical.canvas(2000.0, 600.0);
        assert_eq!(h_canvas.width, v_canvas.height);
        assert_eq!(h_canvas.height, v_canvas.width);
    }

    #[test]
    fn planning_is_deterministic() {
        let journey = Journey::sample();
        let first = plan(&journey, Mode::Vertical);
        let second = plan(&journey, Mode::Vertical);
        assert_eq!(first, second);
    }

    #[test]
    fn toggling_mode_twice_restores_the_plan() {
        let journey = Journey::sample();
        let mode = Mode::Horizontal;
        let original = plan(&journey, mode);
        let round_trip = plan(&journey, mode.toggled().toggled());
        assert_eq!(mode.toggled().toggled(), mode);
        assert_eq!(original, round_trip);
    }
}
