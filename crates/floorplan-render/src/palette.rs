//! Plan-view colors.

use peniko::Color;

pub const BACKGROUND: Color = Color::from_rgba8(0x03, 0x07, 0x12, 255);
pub const GRID: Color = Color::from_rgba8(0x1f, 0x29, 0x37, 255);
pub const SELECTED: Color = Color::from_rgba8(0x60, 0xa5, 0xfa, 255);
pub const WHITE: Color = Color::from_rgba8(255, 255, 255, 255);

pub const WALL: Color = Color::from_rgba8(0x9c, 0xa3, 0xaf, 255);
pub const WALL_CORE: Color = Color::from_rgba8(0x4b, 0x55, 0x63, 255);
pub const WALL_GLASS: Color = Color::from_rgba8(0xa5, 0xf3, 0xfc, 255);
pub const WALL_BRICK: Color = Color::from_rgba8(0xb9, 0x1c, 0x1c, 255);
pub const WALL_BRICK_CORE: Color = Color::from_rgba8(0xef, 0x44, 0x44, 255);

pub const DOOR: Color = Color::from_rgba8(0xfb, 0xbf, 0x24, 255);
pub const WINDOW: Color = Color::from_rgba8(0x38, 0xbd, 0xf8, 255);
pub const WINDOW_CUT: Color = Color::from_rgba8(0x1f, 0x29, 0x37, 255);
pub const WINDOW_GLASS: Color = Color::from_rgba8(0x87, 0xce, 0xeb, 255);

pub const FURNITURE: Color = Color::from_rgba8(0xa7, 0x8b, 0xfa, 255);
pub const FURNITURE_LIGHT: Color = Color::from_rgba8(0xc4, 0xb5, 0xfd, 255);
pub const BED: Color = Color::from_rgba8(0xd8, 0xb4, 0xfe, 255);
pub const BED_COVER: Color = Color::from_rgba8(0xc0, 0x84, 0xfc, 255);
pub const TABLE: Color = Color::from_rgba8(0xd1, 0xd5, 0xdb, 255);
pub const TABLE_GLASS: Color = Color::from_rgba8(173, 216, 230, 128);
pub const FIXTURE_METAL: Color = Color::from_rgba8(0x94, 0xa3, 0xb8, 255);
pub const BURNER: Color = Color::from_rgba8(0x1f, 0x29, 0x37, 255);
pub const FOLIAGE_DARK: Color = Color::from_rgba8(0x16, 0x65, 0x34, 255);
pub const CAR_BODY: Color = Color::from_rgba8(0x6b, 0x72, 0x80, 255);
pub const CAR_ROOF: Color = Color::from_rgba8(0x9c, 0xa3, 0xaf, 255);
pub const LAMP: Color = Color::from_rgba8(0xfb, 0xbf, 0x24, 255);
pub const PLACE_DEFAULT: Color = Color::from_rgba8(0x63, 0x66, 0xf1, 255);

pub const ELECTRICAL: Color = Color::from_rgba8(0xfa, 0xcc, 0x15, 255);
pub const PLUMBING: Color = Color::from_rgba8(0x34, 0xd3, 0x99, 255);
pub const EXTERIOR: Color = Color::from_rgba8(0x4a, 0xde, 0x80, 255);

pub const AREA_FILL: Color = Color::from_rgba8(255, 255, 255, 13);
pub const AREA_SELECTED: Color = Color::from_rgba8(96, 165, 250, 51);
pub const FLOOR_FILL: Color = Color::from_rgba8(50, 50, 50, 77);
pub const GARDEN_FILL: Color = Color::from_rgba8(22, 101, 52, 26);
pub const POOL_FILL: Color = Color::from_rgba8(6, 182, 212, 77);
pub const ROAD_FILL: Color = Color::from_rgba8(55, 65, 81, 102);

pub const PREVIEW: Color = Color::from_rgba8(255, 255, 255, 128);
