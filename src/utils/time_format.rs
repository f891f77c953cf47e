// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 将秒数格式化为可读的时长字符串
///
/// 一分钟以内显示秒，一小时以内显示分+秒，更长显示时+分。
pub fn format_duration_secs(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        format!("{}s", seconds.round() as u64)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0).floor() as u64;
        let rest = (seconds % 60.0).round() as u64;
        format!("{}m {}s", minutes, rest)
    } else {
        let hours = (seconds / 3600.0).floor() as u64;
        let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
        format!("{}h {}m", hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_duration_secs(0.0), "0s");
        assert_eq!(format_duration_secs(42.4), "42s");
        assert_eq!(format_duration_secs(59.4), "59s");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_duration_secs(60.0), "1m 0s");
        assert_eq!(format_duration_secs(125.0), "2m 5s");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_duration_secs(3600.0), "1h 0m");
        assert_eq!(format_duration_secs(7380.0), "2h 3m");
    }

    #[test]
    fn test_negative_clamped_to_zero() {
        assert_eq!(format_duration_secs(-5.0), "0s");
    }
}
