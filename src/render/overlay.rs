use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::session::FrameReport;

const BOX_HEIGHT: i32 = 60;

fn white() -> Scalar {
    Scalar::new(255.0, 255.0, 255.0, 0.0)
}

/// BGR
fn feedback_color(positive: bool) -> Scalar {
    if positive {
        Scalar::new(0.0, 255.0, 0.0, 0.0)
    } else {
        Scalar::new(0.0, 0.0, 255.0, 0.0)
    }
}

fn put_text(frame: &mut Mat, text: &str, org: (i32, i32), scale: f64, color: Scalar, thickness: i32) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        Point::new(org.0, org.1),
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        color,
        thickness,
        imgproc::LINE_AA,
        false,
    )?;
    Ok(())
}

/// 画面上部のステータスボックス（種目 / REPS or STATE / フィードバック）
pub fn draw_status(frame: &mut Mat, report: &FrameReport) -> Result<()> {
    let width = frame.cols();
    imgproc::rectangle(
        frame,
        Rect::new(0, 0, width, BOX_HEIGHT),
        Scalar::new(0.0, 0.0, 0.0, 0.0),
        -1,
        imgproc::LINE_8,
        0,
    )?;

    put_text(frame, "EXERCISE", (15, 12), 0.5, white(), 1)?;
    put_text(frame, report.exercise.title(), (10, 45), 0.8, white(), 2)?;

    put_text(frame, report.headline(), (width * 2 / 5 + 5, 12), 0.5, white(), 1)?;
    put_text(frame, &report.value(), (width * 2 / 5, 45), 1.0, white(), 2)?;

    put_text(frame, "FEEDBACK", (width * 3 / 5 + 5, 12), 0.5, white(), 1)?;
    put_text(frame, report.feedback.text, (width * 3 / 5, 45), 0.8, feedback_color(report.feedback.positive), 2)?;

    Ok(())
}
