//! 本檔案僅收錄「有名且有固定公式」的幾何演算法。
//! 例如：曼哈頓距離、切比雪夫方形範圍。
//! 若為專案自訂、僅用於單一場景的規則，請勿放於此處。
use crate::*;

/// 曼哈頓距離 |dx| + |dy|
pub fn manhattan_distance(from: Pos, to: Pos) -> Coord {
    from.x.abs_diff(to.x) + from.y.abs_diff(to.y)
}

/// 切比雪夫半徑內的方形範圍（含中心），列優先，只保留 is_valid 通過的座標
pub fn square_area(center: Pos, radius: Coord, is_valid: impl Fn(Pos) -> bool) -> Vec<Pos> {
    let x_range = center.x.saturating_sub(radius)..=center.x.saturating_add(radius);
    let y_range = center.y.saturating_sub(radius)..=center.y.saturating_add(radius);
    y_range
        .flat_map(|y| x_range.clone().map(move |x| Pos { x, y }))
        .filter(|pos| is_valid(*pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let test_data = [
            (Pos::new(0, 0), Pos::new(0, 0), 0),
            (Pos::new(0, 0), Pos::new(0, 3), 3),
            (Pos::new(2, 5), Pos::new(5, 1), 7),
            (Pos::new(5, 1), Pos::new(2, 5), 7),
        ];
        for (from, to, expected) in test_data {
            assert_eq!(manhattan_distance(from, to), expected, "{from} -> {to}");
        }
    }

    #[test]
    fn test_square_area_near_origin() {
        // 左上角不能往負座標延伸
        let area = square_area(Pos::new(0, 0), 1, |_| true);
        assert_eq!(
            area,
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]
        );
    }

    #[test]
    fn test_square_area_filter() {
        let area = square_area(Pos::new(3, 3), 2, |p| p.x != 3);
        assert_eq!(area.len(), 20);
        assert!(area.iter().all(|p| p.x != 3));
    }
}
