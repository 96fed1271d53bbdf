//! 関節角度の計算
//!
//! 3点 (外側の関節 a, 頂点 b, 外側の関節 c) から頂点の内角を求める。

/// 正規化画像座標上の2D点 (x, y)
pub type Point = (f32, f32);

/// これより短い線分は方向が定まらないものとして扱う
const MIN_SEGMENT: f32 = 1e-4;

/// 頂点 b における b→a と b→c の間の角度（度, 0〜180）
///
/// それぞれの線分の向きを atan2 で求め、差の絶対値を度に変換し、
/// 180° を超える場合は 360° から引いて折り返す。回転方向は区別しない。
///
/// a または c が b と重なる場合は `None`（不定）。不定値を閾値比較に使ってはならない。
pub fn joint_angle(a: Point, b: Point, c: Point) -> Option<f32> {
    if segment_length(b, a) < MIN_SEGMENT || segment_length(b, c) < MIN_SEGMENT {
        return None;
    }

    let radians = f32::atan2(c.1 - b.1, c.0 - b.0) - f32::atan2(a.1 - b.1, a.0 - b.0);
    let angle = radians.to_degrees().abs();
    let angle = if angle > 180.0 { 360.0 - angle } else { angle };

    angle.is_finite().then(|| angle.clamp(0.0, 180.0))
}

fn segment_length(from: Point, to: Point) -> f32 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_joint() {
        let angle = joint_angle((0.0, 0.0), (0.5, 0.0), (1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle((0.5, 0.0), (0.5, 0.5), (1.0, 0.5)).unwrap();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_reflex_angle_is_folded() {
        // 時計回りに270°離れた線分 → 90°
        let angle = joint_angle((0.0, -1.0), (0.0, 0.0), (-1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_is_none() {
        assert_eq!(joint_angle((0.3, 0.3), (0.3, 0.3), (0.6, 0.6)), None);
        assert_eq!(joint_angle((0.1, 0.2), (0.3, 0.3), (0.3, 0.3)), None);
    }

    #[test]
    fn test_nan_input_is_none() {
        assert_eq!(joint_angle((f32::NAN, 0.0), (0.5, 0.5), (1.0, 1.0)), None);
    }

    fn arb_point() -> impl Strategy<Value = Point> {
        (0.0f32..1.0, 0.0f32..1.0)
    }

    proptest! {
        #[test]
        fn angle_is_within_range(a in arb_point(), b in arb_point(), c in arb_point()) {
            if let Some(angle) = joint_angle(a, b, c) {
                prop_assert!((0.0..=180.0).contains(&angle), "angle {} out of range", angle);
            }
        }

        #[test]
        fn angle_is_symmetric_in_outer_points(a in arb_point(), b in arb_point(), c in arb_point()) {
            let forward = joint_angle(a, b, c);
            let backward = joint_angle(c, b, a);
            match (forward, backward) {
                (Some(f), Some(r)) => prop_assert!((f - r).abs() < 1e-3, "{} vs {}", f, r),
                (None, None) => {}
                other => prop_assert!(false, "asymmetric definedness: {:?}", other),
            }
        }
    }
}
