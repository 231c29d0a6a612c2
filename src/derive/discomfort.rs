//! Discomfort index (DI) and its advisory stage.

use crate::record::WeatherRecord;

#[derive(Debug)]
pub struct Discomfort {
    pub index: f64,
    pub stage: &'static str,
    pub comment: &'static str,
}

/// `DI = 0.81T + 0.01H(0.99T − 14.3) + 46.3`
#[must_use]
pub fn evaluate(temp: f64, humidity: f64) -> Discomfort {
    let index = 0.81 * temp + 0.01 * humidity * (0.99 * temp - 14.3) + 46.3;
    let (stage, comment) = stage_for(index);
    Discomfort {
        index,
        stage,
        comment,
    }
}

/// Stage bands with inclusive lower bounds at 68, 75 and 80.
#[must_use]
pub fn stage_for(index: f64) -> (&'static str, &'static str) {
    if index >= 80.0 {
        ("매우높음", "전원 불쾌감을 느낍니다. 다툼 주의! 🤬")
    } else if index >= 75.0 {
        ("높음", "50% 정도 불쾌감을 느낍니다. 😓")
    } else if index >= 68.0 {
        ("보통", "불쾌감이 나타나기 시작합니다. 😐")
    } else {
        ("낮음", "쾌적한 날씨입니다. 상쾌해요! 😄")
    }
}

/// Populate the record when both inputs are present; otherwise the
/// discomfort fields stay absent.
pub fn apply(record: &mut WeatherRecord) {
    let (Some(temp), Some(humidity)) = (record.temperature, record.humidity) else {
        return;
    };
    let discomfort = evaluate(temp, humidity);
    record.discomfort_index = Some(format!("{:.1}", discomfort.index));
    record.discomfort_stage = Some(discomfort.stage.to_string());
    record.discomfort_comment = Some(discomfort.comment.to_string());
}
