//! # Baseline Rate Resolver
//!
//! Produces the one mid-market [`BaselineRate`] every margin in a run is
//! measured against.
//!
//! Strategies, first success wins:
//!
//! 1. the reference provider's own collected quote
//! 2. the external mid-market feed
//! 3. the static approximation table (direct or reciprocal)
//! 4. a neutral `1.0`
//!
//! The feed is called concurrently with quote collection; resolution itself
//! is a pure function of the collected quotes and the feed's answer.

use crate::domain::entities::{BaselineRate, Quote, TransferRequest};
use crate::domain::value_objects::{BaselineSource, ProviderKey};
use crate::infrastructure::rates::{MidMarketRate, MidMarketRateService, StaticRateTable};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Resolves the run's baseline rate.
#[derive(Debug, Clone)]
pub struct BaselineResolver {
    rate_service: Option<Arc<dyn MidMarketRateService>>,
    static_table: StaticRateTable,
    reference_provider: Option<ProviderKey>,
    service_timeout: Duration,
}

impl BaselineResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        rate_service: Option<Arc<dyn MidMarketRateService>>,
        static_table: StaticRateTable,
        reference_provider: Option<ProviderKey>,
        service_timeout: Duration,
    ) -> Self {
        Self {
            rate_service,
            static_table,
            reference_provider,
            service_timeout,
        }
    }

    /// Returns the reference provider key.
    #[must_use]
    pub fn reference_provider(&self) -> Option<&ProviderKey> {
        self.reference_provider.as_ref()
    }

    /// Asks the external feed for a rate. Failures are logged and yield `None`.
    pub async fn fetch_external(&self, request: &TransferRequest) -> Option<MidMarketRate> {
        let service = self.rate_service.as_ref()?;
        let fetch = service.fetch_mid_market_rate(request.from_currency(), request.to_currency());
        match timeout(self.service_timeout, fetch).await {
            Ok(Ok(rate)) => Some(rate),
            Ok(Err(error)) => {
                warn!(pair = %request.pair(), error = %error, "mid-market rate service failed");
                None
            }
            Err(_) => {
                warn!(pair = %request.pair(), "mid-market rate service timed out");
                None
            }
        }
    }

    /// Picks the reference provider's quote out of a collected set.
    ///
    /// With several candidates the highest-priority channel wins, and the
    /// earliest quote among equals.
    #[must_use]
    pub fn reference_quote<'a>(&self, quotes: &'a [Quote]) -> Option<&'a Quote> {
        let key = self.reference_provider.as_ref()?;
        let mut chosen: Option<&Quote> = None;
        for quote in quotes.iter().filter(|q| q.provider_key() == key) {
            let better = chosen.is_none_or(|current| {
                quote.source_channel().priority() > current.source_channel().priority()
            });
            if better {
                chosen = Some(quote);
            }
        }
        chosen
    }

    /// Resolves the baseline from the collected quotes and the feed's answer.
    #[must_use]
    pub fn resolve(
        &self,
        request: &TransferRequest,
        quotes: &[Quote],
        external: Option<MidMarketRate>,
    ) -> BaselineRate {
        if let Some(quote) = self.reference_quote(quotes)
            && let Ok(baseline) = BaselineRate::new(quote.rate(), BaselineSource::ReferenceProvider)
        {
            debug!(provider = %quote.provider_key(), rate = %quote.rate(), "baseline from reference provider");
            return baseline;
        }

        if let Some(external) = external
            && let Ok(baseline) = BaselineRate::at(
                external.rate,
                BaselineSource::ExternalService,
                external.timestamp,
            )
        {
            debug!(rate = %external.rate, "baseline from rate service");
            return baseline;
        }

        if let Some(rate) = self.static_table.lookup(&request.pair())
            && let Ok(baseline) = BaselineRate::new(rate, BaselineSource::StaticApproximation)
        {
            warn!(pair = %request.pair(), rate = %rate, "baseline from static approximation");
            return baseline;
        }

        warn!(pair = %request.pair(), "baseline unresolvable, using neutral default");
        BaselineRate::neutral()
    }
}
