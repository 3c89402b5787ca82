use floorplan_core::floor::{FloorStructure, Room};
use floorplan_core::geometry::Bounds2D;
use tracing::debug;

use crate::classify::classify_region;
use crate::detect::CandidateRegion;
use crate::extract::Extraction;

/// 将候选区域、分类结果与全局墙/门/窗装配为 `FloorStructure`。
///
/// 墙体任一端点落在房间范围内即归属该房间，共享墙会复制到多个房间；
/// 门记录所有包含其位置的房间 ID。整个过程不含随机性，输入相同则输出逐字节一致。
pub fn assemble(
    candidates: &[CandidateRegion],
    extraction: Extraction,
    bounds: Bounds2D,
) -> FloorStructure {
    let Extraction {
        walls,
        mut doors,
        windows,
    } = extraction;

    for door in &mut doors {
        let position = door.position;
        door.room_ids.extend(
            candidates
                .iter()
                .filter(|candidate| candidate.bounds.contains(position))
                .map(|candidate| candidate.id.clone()),
        );
    }

    let rooms: Vec<Room> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let region = candidate.bounds;
            let room_type = classify_region(&region, &doors, &windows);
            Room {
                id: candidate.id.clone(),
                name: format!("{} {}", room_type.title(), index + 1),
                room_type,
                bounds: region,
                walls: walls
                    .iter()
                    .filter(|wall| wall.endpoints().into_iter().any(|p| region.contains(p)))
                    .copied()
                    .collect(),
                doors: doors
                    .iter()
                    .filter(|door| region.contains(door.position))
                    .cloned()
                    .collect(),
                windows: windows
                    .iter()
                    .filter(|window| region.contains(window.position))
                    .copied()
                    .collect(),
                area: region.area(),
            }
        })
        .collect();

    debug!(
        rooms = rooms.len(),
        walls = walls.len(),
        doors = doors.len(),
        windows = windows.len(),
        "楼层结构装配完成"
    );

    FloorStructure {
        rooms,
        walls,
        doors,
        windows,
        bounds,
    }
}
