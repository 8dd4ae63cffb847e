use chrono::{DateTime, Utc};
use mg_schemas::{DeliveryBlockedReason, DeliveryCandidate, Verdict};

/// Contract-level inputs the evaluator needs for one scheduled delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractGate {
    /// Signature timestamp; `None` means the contract was never signed.
    pub signed_at: Option<DateTime<Utc>>,
    /// True while the contract's payment precondition is unmet.
    pub payment_pending: bool,
}

impl ContractGate {
    pub fn of(candidate: &DeliveryCandidate) -> Self {
        Self {
            signed_at: candidate.item.contract_signed_at,
            payment_pending: candidate.payment_pending,
        }
    }
}

/// Decide whether expedition may proceed. First match wins:
///
/// 1. unsigned contract -> `CONTRATO_NAO_ASSINADO`
/// 2. payment pending   -> `PAGAMENTO_PENDENTE`
/// 3. otherwise released
///
/// Total and pure. A signature dated in the future, or after the delivery
/// date, still counts as signed.
pub fn evaluate(gate: &ContractGate) -> Verdict {
    if gate.signed_at.is_none() {
        return Verdict::blocked(DeliveryBlockedReason::ContratoNaoAssinado);
    }

    if gate.payment_pending {
        return Verdict::blocked(DeliveryBlockedReason::PagamentoPendente);
    }

    Verdict::released()
}

pub fn evaluate_candidate(candidate: &DeliveryCandidate) -> Verdict {
    evaluate(&ContractGate::of(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signed() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn every_input_combination_keeps_blocked_and_reason_in_sync() {
        for signed_at in [None, signed()] {
            for payment_pending in [false, true] {
                let v = evaluate(&ContractGate {
                    signed_at,
                    payment_pending,
                });
                assert_eq!(v.is_blocked(), v.reason().is_some());
            }
        }
    }

    #[test]
    fn future_signature_still_counts_as_signed() {
        let v = evaluate(&ContractGate {
            signed_at: Some(Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap()),
            payment_pending: false,
        });
        assert_eq!(v, Verdict::released());
    }
}
