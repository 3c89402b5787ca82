use std::fmt::Write as _;
use std::path::PathBuf;

use floorplan_config::AppConfig;
use floorplan_core::floor::FloorStructure;
use floorplan_io::save_floor_structure;
use tracing::info;

use crate::errors::FrontendError;
use crate::loader::{LoadedPlan, PlanSource, load_plan};
use crate::render::{PlanRenderer, RenderOutcome};
use crate::style::StyleTable;
use crate::svg::SvgCanvas;

/// 命令行选项（由二进制入口解析后传入）。
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub input: Option<PathBuf>,
    pub svg_output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub canvas_size: Option<(f64, f64)>,
}

/// 加载并分析平面，打印房间报告，按需导出 SVG 与 JSON。
pub fn run(config: &AppConfig, options: &CliOptions) -> Result<(), FrontendError> {
    let mut loaded = load_plan(config, options.input.as_deref())?;
    if let Some((width, height)) = options.canvas_size {
        loaded.scene.resize(width, height)?;
    }

    print!("{}", format_report(&loaded));

    if let Some(path) = &options.svg_output {
        let renderer = PlanRenderer::new(
            StyleTable::from_config(&config.layers, &config.render)?,
            config.render.max_scale,
        );
        let (width, height) = loaded.scene.canvas_size();
        let mut canvas = SvgCanvas::new(width, height);
        let outcome = renderer.render_scene(Some(&mut canvas), &loaded.scene);
        canvas.write_to(path)?;
        info!(path = %path.display(), outcome = %describe_outcome(outcome), "SVG 已写出");
        println!("SVG 已写出：{}", path.display());
    }

    if let Some(path) = &options.json_output {
        if let Some(floor) = loaded.scene.floor() {
            save_floor_structure(floor, path)?;
            info!(path = %path.display(), "楼层结构 JSON 已写出");
            println!("楼层结构已写出：{}", path.display());
        }
    }

    Ok(())
}

/// 生成文本报告：来源、范围、统计与逐个房间摘要。
pub fn format_report(loaded: &LoadedPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "楼层结构分析报告");
    match &loaded.source {
        PlanSource::Payload(path) => {
            let _ = writeln!(out, "已从实体载荷加载：{}", path.display());
        }
        PlanSource::Demo => {
            let _ = writeln!(out, "使用内置示例平面");
        }
    }
    let _ = writeln!(
        out,
        "实体数={}, 检测策略参数: 网格={:.1}, 容差={:.1}",
        loaded.scene.entities().len(),
        loaded.analyzer.settings().detection.grid_cell_size,
        loaded.analyzer.settings().detection.wall_tolerance
    );

    match loaded.scene.floor() {
        Some(floor) => write_floor(&mut out, floor),
        None => {
            let _ = writeln!(out, "尚未生成楼层结构。");
        }
    }
    out
}

fn write_floor(out: &mut String, floor: &FloorStructure) {
    let bounds = &floor.bounds;
    let _ = writeln!(
        out,
        "范围=({:.2}, {:.2}) - ({:.2}, {:.2}), 尺寸={:.2} × {:.2}",
        bounds.min_x(),
        bounds.min_y(),
        bounds.max_x(),
        bounds.max_y(),
        bounds.width(),
        bounds.height()
    );
    let _ = writeln!(
        out,
        "墙体={}, 门={}, 窗={}, 房间={}",
        floor.walls.len(),
        floor.doors.len(),
        floor.windows.len(),
        floor.rooms.len()
    );
    let _ = writeln!(out, "房间列表：");
    for room in &floor.rooms {
        let summary = room.summary();
        let _ = writeln!(
            out,
            "  - {} [{}] 类型={}, 面积={:.0}, 门={}, 窗={}, 墙={}",
            summary.name,
            summary.id,
            summary.room_type,
            summary.area,
            summary.door_count,
            summary.window_count,
            room.walls.len()
        );
    }
    for (index, door) in floor.doors.iter().enumerate() {
        let rooms: Vec<&str> = door.room_ids.iter().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "  门 #{index}: 位置=({:.2}, {:.2}), 宽度={:.1}, 所属房间={}",
            door.position.x(),
            door.position.y(),
            door.width,
            if rooms.is_empty() { "-".to_string() } else { rooms.join(", ") }
        );
    }
}

/// 渲染结果的简短描述，供日志与调试输出。
pub fn describe_outcome(outcome: RenderOutcome) -> String {
    match outcome {
        RenderOutcome::Rendered { entities, rooms } => format!("已渲染 {entities} 个实体、{rooms} 个房间"),
        RenderOutcome::NoSurface => "绘图表面不可用".to_string(),
        RenderOutcome::Placeholder => "无楼层结构，仅显示占位提示".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_room() {
        let loaded = load_plan(&AppConfig::default(), None).expect("load demo");
        let report = format_report(&loaded);
        assert!(report.contains("使用内置示例平面"));
        let floor = loaded.scene.floor().expect("floor");
        for room in &floor.rooms {
            assert!(report.contains(&room.name));
        }
        assert!(report.contains("范围=(0.00, 0.00) - (400.00, 250.00)"));
    }

    #[test]
    fn run_writes_svg_and_json() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let svg = dir.path().join("plan.svg");
        let json = dir.path().join("plan.json");
        let options = CliOptions {
            input: None,
            svg_output: Some(svg.clone()),
            json_output: Some(json.clone()),
            canvas_size: Some((640.0, 480.0)),
        };
        run(&AppConfig::default(), &options).expect("run cli");

        let svg_text = std::fs::read_to_string(&svg).expect("read svg");
        assert!(svg_text.contains(r#"width="640" height="480""#));
        assert!(svg_text.contains("stroke-dasharray"));
        let json_text = std::fs::read_to_string(&json).expect("read json");
        assert!(json_text.contains("\"rooms\""));
    }

    #[test]
    fn outcome_descriptions_are_distinct() {
        let rendered = describe_outcome(RenderOutcome::Rendered { entities: 3, rooms: 1 });
        assert!(rendered.contains('3'));
        assert_ne!(
            describe_outcome(RenderOutcome::NoSurface),
            describe_outcome(RenderOutcome::Placeholder)
        );
    }
}
