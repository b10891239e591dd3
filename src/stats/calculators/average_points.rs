use crate::scoring::RoundRecord;
use crate::stats::AveragePoints;

fn mean(points: &[i32]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|&p| f64::from(p)).sum::<f64>() / points.len() as f64
}

pub fn average_points(rounds: &[RoundRecord]) -> AveragePoints {
    let (bock, normal): (Vec<&RoundRecord>, Vec<&RoundRecord>) =
        rounds.iter().partition(|r| r.is_bock);

    let bock: Vec<i32> = bock.iter().map(|r| r.points).collect();
    let normal: Vec<i32> = normal.iter().map(|r| r.points).collect();

    AveragePoints {
        normal: mean(&normal),
        normal_rounds: normal.len() as u32,
        bock: mean(&bock),
        bock_rounds: bock.len() as u32,
    }
}
