//! Property tests for chain evaluation and the built-in guards.

use admission_core::{
    AdmissionRequest, Chain, Credential, CredentialGuard, Decision, FnGuard, Guard,
    IdentityDirectory, InMemoryDirectory, ManualClock, RateLimiter, RejectionKind,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Scripted {
    Admit,
    AdmitFinal,
    Reject,
}

fn arb_scripted() -> impl Strategy<Value = Scripted> {
    prop_oneof![
        3 => Just(Scripted::Admit),
        1 => Just(Scripted::AdmitFinal),
        1 => Just(Scripted::Reject),
    ]
}

fn arb_identity() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9.]{1,12}@[a-z]{2,8}\\.com").unwrap()
}

/// Builds a chain of scripted guards, returning per-guard call counters.
fn scripted_chain(script: &[Scripted]) -> (Chain, Vec<Arc<AtomicUsize>>) {
    let mut builder = Chain::builder();
    let mut counters = Vec::new();
    for (i, step) in script.iter().copied().enumerate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let guard = FnGuard::new(format!("guard-{i}"), move |_: &AdmissionRequest| {
            counter.fetch_add(1, Ordering::SeqCst);
            match step {
                Scripted::Admit => Decision::Admit,
                Scripted::AdmitFinal => Decision::AdmitFinal,
                Scripted::Reject => Decision::reject_with(format!("rejected by {i}")),
            }
        });
        builder = builder.guard(guard);
        counters.push(calls);
    }
    (builder.build().unwrap(), counters)
}

proptest! {
    /// Property: a chain without guards admits every request
    #[test]
    fn proptest_empty_chain_admits_everything(
        identity in ".*",
        credential in ".*",
    ) {
        let verdict = Chain::empty().admit(&AdmissionRequest::new(identity, credential));
        prop_assert!(verdict.admitted);
        prop_assert!(verdict.reason.is_empty());
    }

    /// Property: guards run in order up to and including the first guard that
    /// rejects or grants final admission, and never after it
    #[test]
    fn proptest_first_terminal_decision_wins(
        script in prop::collection::vec(arb_scripted(), 0..12),
    ) {
        let (chain, counters) = scripted_chain(&script);
        let verdict = chain.admit(&AdmissionRequest::new("user@example.com", "pw"));

        let terminal = script
            .iter()
            .position(|s| !matches!(s, Scripted::Admit));

        match terminal {
            None => {
                prop_assert!(verdict.admitted);
                prop_assert!(!verdict.final_grant);
                prop_assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
            }
            Some(stop) => {
                match script[stop] {
                    Scripted::Reject => {
                        prop_assert!(!verdict.admitted);
                        prop_assert_eq!(verdict.reason.clone(), format!("rejected by {stop}"));
                        prop_assert_eq!(verdict.rejection_kind(), Some(RejectionKind::Custom));
                    }
                    Scripted::AdmitFinal => {
                        prop_assert!(verdict.admitted);
                        prop_assert!(verdict.final_grant);
                    }
                    Scripted::Admit => unreachable!(),
                }
                let expected_by = format!("guard-{stop}");
                prop_assert_eq!(verdict.decided_by.as_deref(), Some(expected_by.as_str()));
                for (i, counter) in counters.iter().enumerate() {
                    let expected = usize::from(i <= stop);
                    prop_assert_eq!(counter.load(Ordering::SeqCst), expected);
                }
            }
        }
    }

    /// Property: with limit N, exactly the first N calls in a window are
    /// admitted and a call after the window elapses is admitted again
    #[test]
    fn proptest_rate_limiter_admits_first_n(
        limit in 1u32..40,
        extra in 1usize..20,
        window_ms in 1u64..120_000,
    ) {
        let clock = Arc::new(ManualClock::new());
        let window = Duration::from_millis(window_ms);
        let limiter = RateLimiter::with_clock(limit, window, clock.clone()).unwrap();
        let request = AdmissionRequest::new("user@example.com", "pw");

        let outcomes: Vec<bool> = (0..limit as usize + extra)
            .map(|_| limiter.evaluate(&request).is_admitting())
            .collect();

        prop_assert!(outcomes[..limit as usize].iter().all(|&ok| ok));
        prop_assert!(outcomes[limit as usize..].iter().all(|&ok| !ok));

        clock.advance(window + Duration::from_millis(1));
        prop_assert!(limiter.evaluate(&request).is_admitting());
    }

    /// Property: the credential guard's answer depends only on existence
    /// and secret match, in that order
    #[test]
    fn proptest_credential_guard_truth_table(
        registered in arb_identity(),
        secret in "[ -~]{0,16}",
        presented_identity in arb_identity(),
        presented_secret in "[ -~]{0,16}",
    ) {
        let directory = Arc::new(
            InMemoryDirectory::new().with_identity(registered.clone(), secret.clone()),
        );
        let guard = CredentialGuard::new(directory.clone());
        let request = AdmissionRequest::new(presented_identity.clone(), presented_secret.clone());

        let exists = directory.exists(&presented_identity).unwrap();
        let matches = directory
            .matches(&presented_identity, &Credential::new(presented_secret.clone()))
            .unwrap();

        let expected = match (exists, matches) {
            (false, _) => Decision::reject(RejectionKind::UnknownIdentity),
            (true, false) => Decision::reject(RejectionKind::InvalidCredential),
            (true, true) => Decision::Admit,
        };
        prop_assert_eq!(guard.evaluate(&request), expected);
        prop_assert_eq!(exists, presented_identity == registered);
        prop_assert_eq!(matches, exists && presented_secret == secret);
    }

    /// Property: credentials never appear in formatted requests
    #[test]
    fn proptest_credential_never_rendered(
        identity in arb_identity(),
        secret in "[A-Z0-9]{10,20}",
    ) {
        let request = AdmissionRequest::new(identity, secret.clone());
        let debug_output = format!("{:?}", request);
        prop_assert!(!debug_output.contains(&secret));
        let display_output = format!("{}", request.credential());
        prop_assert!(display_output == "[REDACTED]");
    }
}
