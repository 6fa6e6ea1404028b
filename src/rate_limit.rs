use log::debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Wait issued between consecutive API calls.
pub trait Pause {
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pause for FixedDelay {
    async fn pause(&self) {
        debug!("Rate limiting: sleeping {:?}", self.delay);
        sleep(self.delay).await;
    }
}
