//! 토큰 발급/검증에 사용하는 시간 소스.

use chrono::Utc;

/// 현재 시각(Unix timestamp, 초)을 제공하는 시계.
///
/// 코덱과 게이트가 같은 시계를 공유하므로 만료 판정과 갱신 판정이
/// 항상 같은 "현재"를 기준으로 합니다.
pub trait Clock: Send + Sync + 'static {
    /// 현재 Unix timestamp (초).
    fn now(&self) -> i64;
}

/// 시스템 시계 (`chrono::Utc`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// 수동으로 조작하는 시계 (테스트용).
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::atomic::AtomicI64,
}

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: std::sync::atomic::AtomicI64::new(start),
        }
    }

    /// 시각을 지정한 값으로 설정.
    pub fn set(&self, timestamp: i64) {
        self.now
            .store(timestamp, std::sync::atomic::Ordering::SeqCst);
    }

    /// 시각을 `secs`초 앞으로 이동.
    pub fn advance(&self, secs: i64) {
        self.now
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}
