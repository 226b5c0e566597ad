//! The Gateway: one entry point for creating payments and handling callbacks.
//!
//! The gateway owns the per-processor builders and verifiers, built once from
//! an immutable [`GatewayConfig`], and the outbound [`Transport`].

use std::sync::Arc;
use std::time::Duration;

use paygate_core::{
    Acknowledgement, CallbackResult, Clock, IdGenerator, ParameterSet, SystemClock, UuidGenerator,
};
use paygate_momo::{
    interpret_response, MomoCreateOutcome, MomoIpnVerifier, MomoPaymentRequest, MomoRequestBuilder,
};
use paygate_transport::Transport;
use paygate_vnpay::{
    VnpayAcknowledgement, VnpayCreateResult, VnpayPaymentRequest, VnpayRequestBuilder,
    VnpayVerifier,
};
use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Processor, Result};
use crate::inbound::{flatten_json, parse_query};

/// A MoMo payment the processor accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoPaymentCreated {
    pub order_id: String,
    pub request_id: String,
    /// Amount as sent to MoMo.
    pub amount: String,
    pub pay_url: String,
    pub deeplink: Option<String>,
    pub qr_code_url: Option<String>,
}

/// Verification outcome of an IPN together with the reply for the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpnReply<A> {
    pub result: CallbackResult,
    pub ack: A,
}

struct Momo {
    builder: MomoRequestBuilder,
    verifier: MomoIpnVerifier,
}

struct Vnpay {
    builder: VnpayRequestBuilder,
    verifier: VnpayVerifier,
}

/// The payment gateway facade.
pub struct Gateway {
    momo: Option<Momo>,
    vnpay: Option<Vnpay>,
    transport: Arc<dyn Transport>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl Gateway {
    /// Build a gateway over an explicit transport.
    ///
    /// Every configured processor is validated here; nothing is checked lazily.
    pub fn new(config: GatewayConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let momo = match config.momo {
            Some(momo) => Some(Momo {
                verifier: MomoIpnVerifier::new(&momo)?,
                builder: MomoRequestBuilder::new(momo)?,
            }),
            None => None,
        };
        let vnpay = match config.vnpay {
            Some(vnpay) => Some(Vnpay {
                verifier: VnpayVerifier::new(&vnpay)?,
                builder: VnpayRequestBuilder::new(vnpay)?,
            }),
            None => None,
        };

        tracing::info!(
            momo = momo.is_some(),
            vnpay = vnpay.is_some(),
            "payment gateway configured"
        );

        Ok(Self {
            momo,
            vnpay,
            transport,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
            request_timeout: config.http.request_timeout(),
        })
    }

    /// Build a gateway that talks HTTPS with the configured timeouts.
    #[cfg(feature = "http")]
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let transport = paygate_transport::http::ReqwestTransport::new(
            config.http.connect_timeout(),
            config.http.request_timeout(),
        )
        .map_err(|e| GatewayError::Configuration(format!("http client: {}", e)))?;
        Self::new(config, Arc::new(transport))
    }

    /// Replace the identifier source.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn supports_momo(&self) -> bool {
        self.momo.is_some()
    }

    pub fn supports_vnpay(&self) -> bool {
        self.vnpay.is_some()
    }

    fn momo(&self) -> Result<&Momo> {
        self.momo
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration("momo".into()))
    }

    fn vnpay(&self) -> Result<&Vnpay> {
        self.vnpay
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration("vnpay".into()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // MoMo
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a MoMo payment and return the URL to send the buyer to.
    pub async fn create_momo_payment(
        &self,
        request: &MomoPaymentRequest,
    ) -> Result<MomoPaymentCreated> {
        let momo = self.momo()?;
        tracing::info!(amount = request.amount, "received momo payment request");

        let signed = momo
            .builder
            .build(request, self.ids.as_ref(), self.clock.as_ref())
            .map_err(|reason| {
                tracing::warn!(reason = %reason, code = reason.code(), "momo request rejected");
                GatewayError::from(reason)
            })?;

        let body = serde_json::to_vec(&signed.body)
            .map_err(|e| GatewayError::MalformedInput(format!("cannot encode request: {}", e)))?;
        let endpoint = &momo.builder.config().endpoint_url;

        let response = match tokio::time::timeout(
            self.request_timeout,
            self.transport.post_json(endpoint, body),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(order_id = %signed.intent.order_id, error = %e, "momo unreachable");
                return Err(GatewayError::unavailable(Processor::Momo, e.to_string()));
            }
            Err(_) => {
                tracing::error!(order_id = %signed.intent.order_id, "momo did not answer in time");
                return Err(GatewayError::unavailable(
                    Processor::Momo,
                    format!("no response within {}s", self.request_timeout.as_secs()),
                ));
            }
        };

        match interpret_response(response.status, &response.body) {
            MomoCreateOutcome::Created(payment) => {
                tracing::info!(order_id = %signed.intent.order_id, "momo payment created");
                Ok(MomoPaymentCreated {
                    order_id: signed.body.order_id,
                    request_id: signed.body.request_id,
                    amount: signed.body.amount,
                    pay_url: payment.pay_url,
                    deeplink: payment.deeplink,
                    qr_code_url: payment.qr_code_url,
                })
            }
            MomoCreateOutcome::Rejected {
                message,
                local_message,
                result_code,
                error_code,
            } => {
                tracing::warn!(
                    order_id = %signed.intent.order_id,
                    result_code = ?result_code,
                    error_code = ?error_code,
                    message = ?message,
                    "momo rejected payment"
                );
                Err(GatewayError::GatewayRejected {
                    result_code,
                    error_code,
                    message,
                    local_message,
                })
            }
            MomoCreateOutcome::Unavailable { reason } => {
                tracing::error!(order_id = %signed.intent.order_id, reason = %reason, "momo unavailable");
                Err(GatewayError::unavailable(Processor::Momo, reason))
            }
        }
    }

    /// Verify an already-flattened MoMo IPN.
    pub fn verify_momo_ipn(&self, params: &ParameterSet) -> Result<CallbackResult> {
        Ok(self.momo()?.verifier.verify(params))
    }

    /// Verify a raw MoMo IPN body and build MoMo's acknowledgement.
    pub fn handle_momo_ipn(&self, body: &[u8]) -> Result<IpnReply<Acknowledgement>> {
        let momo = self.momo()?;
        let result = match flatten_json(body) {
            Ok(params) => momo.verifier.verify(&params),
            Err(e) => {
                tracing::warn!(error = %e, "momo ipn unreadable");
                CallbackResult::MalformedInput {
                    reason: e.to_string(),
                }
            }
        };
        let ack = MomoIpnVerifier::acknowledge(&result);
        Ok(IpnReply { result, ack })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // VNPAY
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a signed VNPAY payment URL.
    pub fn create_vnpay_payment(&self, request: &VnpayPaymentRequest) -> Result<VnpayCreateResult> {
        let vnpay = self.vnpay()?;
        tracing::info!(amount = request.amount, "received vnpay payment request");

        let signed = vnpay
            .builder
            .build(request, self.ids.as_ref(), self.clock.as_ref())
            .map_err(|reason| {
                tracing::warn!(reason = %reason, code = reason.code(), "vnpay request rejected");
                GatewayError::from(reason)
            })?;

        tracing::info!(txn_ref = signed.txn_ref(), "vnpay payment url created");
        Ok(signed.to_result())
    }

    /// Verify an already-parsed VNPAY callback.
    pub fn verify_vnpay_callback(&self, params: &ParameterSet) -> Result<CallbackResult> {
        Ok(self.vnpay()?.verifier.verify(params))
    }

    /// Verify a VNPAY IPN query string and build VNPAY's acknowledgement.
    pub fn handle_vnpay_ipn(&self, query: &str) -> Result<IpnReply<VnpayAcknowledgement>> {
        let vnpay = self.vnpay()?;
        let result = match parse_query(query) {
            Ok(params) => vnpay.verifier.verify(&params),
            Err(e) => {
                tracing::warn!(error = %e, "vnpay ipn unreadable");
                CallbackResult::MalformedInput {
                    reason: e.to_string(),
                }
            }
        };
        let ack = VnpayVerifier::acknowledge(&result);
        Ok(IpnReply { result, ack })
    }

    /// Verify the buyer's return leg.
    ///
    /// Only authentic callbacks are `Ok`; the caller still has to look at
    /// whether the payment succeeded.
    pub fn handle_vnpay_return(&self, query: &str) -> Result<CallbackResult> {
        let vnpay = self.vnpay()?;
        let params = parse_query(query)?;
        match vnpay.verifier.verify(&params) {
            CallbackResult::SignatureMismatch => Err(GatewayError::SignatureMismatch),
            CallbackResult::MalformedInput { reason } => Err(GatewayError::MalformedInput(reason)),
            verified => Ok(verified),
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("momo", &self.momo.is_some())
            .field("vnpay", &self.vnpay.is_some())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
