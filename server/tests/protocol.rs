use std::sync::Arc;

use client::Client;
use messages::{AuthenticationMessage, RejectReason, Request, Response, SignedDigest};
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use rand::rngs::OsRng;
use server::{Rejection, Server};
use templates::Parameters;
use templates::timing::{Phase, Timings};

fn parameters() -> Parameters {
    Parameters::new(3, 10, 16).unwrap()
}

/// Enrol `reference` and authenticate with `probe` through encoded bytes,
/// the way the messages travel
fn distance(server: &Server, reference: &[i64], probe: &[i64]) -> Result<i64, Rejection> {
    let (client, enrolment) = Client::enrol(*server.parameters(), reference, &mut OsRng).unwrap();
    server
        .enrol_bytes(&messages::encode(&enrolment).unwrap())
        .unwrap();

    let (message, signature) = client.authenticate(probe, &mut OsRng).unwrap();
    let message: AuthenticationMessage =
        messages::decode(&messages::encode(&message).unwrap()).unwrap();
    let signature: SignedDigest =
        messages::decode(&messages::encode(&signature).unwrap()).unwrap();

    server
        .authenticate(&message, &signature)
        .map(|distance| distance.value())
}

#[test]
fn identical_templates_are_at_distance_zero() {
    let server = Server::new(parameters()).unwrap();
    assert_eq!(distance(&server, &[1, 2, 3], &[1, 2, 3]).unwrap(), 0);
}

#[test]
fn known_distance() {
    let server = Server::new(parameters()).unwrap();
    assert_eq!(distance(&server, &[0, 0, 0], &[3, 4, 0]).unwrap(), 25);
}

#[test]
fn extreme_templates() {
    let server = Server::new(parameters()).unwrap();
    assert_eq!(distance(&server, &[0, 0, 0], &[10, 10, 10]).unwrap(), 300);
    assert_eq!(distance(&server, &[10, 10, 10], &[0, 0, 0]).unwrap(), 300);
}

prop_compose! {
    fn two_templates()(a in prop::collection::vec(0i64..=15, 4),
                       b in prop::collection::vec(0i64..=15, 4))
                     -> (Vec<i64>, Vec<i64>) {
        (a, b)
    }
}

#[test]
fn recovers_the_squared_euclidean_distance() {
    let mut runner = TestRunner::new(Config::with_cases(8));
    let server = Server::new(Parameters::new(4, 15, 16).unwrap()).unwrap();

    runner
        .run(&two_templates(), |(a, b)| {
            let expected: i64 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
            prop_assert_eq!(distance(&server, &a, &b).unwrap(), expected);
            Ok(())
        })
        .unwrap();
}

#[test]
fn unknown_identifier_is_rejected() {
    let server = Server::new(parameters()).unwrap();
    let (client, _never_sent) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    let (message, signature) = client.authenticate(&[1, 2, 3], &mut OsRng).unwrap();

    let rejection = server.authenticate(&message, &signature).unwrap_err();
    assert!(matches!(rejection, Rejection::UnknownIdentifier(ref rid) if rid == client.rid()));
    assert_eq!(rejection.reason(), RejectReason::UnknownIdentifier);
}

#[test]
fn signature_of_another_client_is_rejected() {
    let server = Server::new(parameters()).unwrap();
    let (alice, enrol_alice) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    let (bob, enrol_bob) = Client::enrol(parameters(), &[4, 5, 6], &mut OsRng).unwrap();
    server.enrol(enrol_alice);
    server.enrol(enrol_bob);

    let (alice_message, _) = alice.authenticate(&[1, 2, 3], &mut OsRng).unwrap();
    let (_, bob_signature) = bob.authenticate(&[1, 2, 3], &mut OsRng).unwrap();

    let rejection = server
        .authenticate(&alice_message, &bob_signature)
        .unwrap_err();
    assert!(matches!(rejection, Rejection::InvalidSignature(ref rid) if rid == alice.rid()));
    // Distinct from an unknown identifier
    assert_eq!(rejection.reason(), RejectReason::InvalidSignature);
}

#[test]
fn swapped_ciphertext_is_rejected() {
    let server = Server::new(parameters()).unwrap();
    let (alice, enrol_alice) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    let (bob, enrol_bob) = Client::enrol(parameters(), &[4, 5, 6], &mut OsRng).unwrap();
    server.enrol(enrol_alice);
    server.enrol(enrol_bob);

    let (mut alice_message, alice_signature) = alice.authenticate(&[1, 2, 3], &mut OsRng).unwrap();
    let (bob_message, _) = bob.authenticate(&[1, 2, 3], &mut OsRng).unwrap();

    // Alice's valid signature no longer covers the message
    alice_message.ciphertext = bob_message.ciphertext;
    assert!(matches!(
        server.authenticate(&alice_message, &alice_signature),
        Err(Rejection::PayloadMismatch(_))
    ));
}

#[test]
fn replayed_signature_over_other_message_is_a_payload_mismatch() {
    let server = Server::new(parameters()).unwrap();
    let (client, enrolment) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    server.enrol(enrolment);

    let (first, _) = client.authenticate(&[1, 2, 3], &mut OsRng).unwrap();
    let (_, second_signature) = client.authenticate(&[9, 9, 9], &mut OsRng).unwrap();

    let rejection = server.authenticate(&first, &second_signature).unwrap_err();
    assert_eq!(rejection.reason(), RejectReason::PayloadMismatch);
}

#[test]
fn each_client_is_evaluated_with_its_own_key() {
    let server = Server::new(parameters()).unwrap();
    let (alice, enrol_alice) = Client::enrol(parameters(), &[0, 0, 0], &mut OsRng).unwrap();
    let (bob, enrol_bob) = Client::enrol(parameters(), &[10, 10, 10], &mut OsRng).unwrap();
    server.enrol(enrol_alice);
    server.enrol(enrol_bob);

    let (message, signature) = alice.authenticate(&[3, 4, 0], &mut OsRng).unwrap();
    assert_eq!(server.authenticate(&message, &signature).unwrap().value(), 25);

    let (message, signature) = bob.authenticate(&[3, 4, 0], &mut OsRng).unwrap();
    assert_eq!(
        server.authenticate(&message, &signature).unwrap().value(),
        49 + 36 + 100
    );
}

#[test]
fn tampered_bytes_never_authenticate() {
    let server = Server::new(parameters()).unwrap();
    let (client, enrolment) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    server.enrol(enrolment);

    let (message, signature) = client.authenticate(&[1, 2, 3], &mut OsRng).unwrap();
    let bytes = messages::encode(&message).unwrap();

    for position in 0..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[position] ^= 0x01;

        if let Ok(received) = messages::decode::<AuthenticationMessage>(&tampered) {
            let rejection = server.authenticate(&received, &signature).unwrap_err();
            assert!(
                matches!(
                    rejection,
                    Rejection::PayloadMismatch(_) | Rejection::UnknownIdentifier(_)
                ),
                "byte {}: {}",
                position,
                rejection
            );
        }
    }
}

#[test]
fn re_enrolment_replaces_keys() {
    let server = Server::new(parameters()).unwrap();
    let (client, enrolment) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    server.enrol(enrolment.clone());
    server.enrol(enrolment);

    assert_eq!(server.database().len(), 1);
    let (message, signature) = client.authenticate(&[1, 2, 5], &mut OsRng).unwrap();
    assert_eq!(server.authenticate(&message, &signature).unwrap().value(), 4);
}

#[test]
fn mismatched_dimensions_fail_decryption() {
    let server = Server::new(parameters()).unwrap();
    let wider = Parameters::new(4, 10, 16).unwrap();
    let (client, enrolment) = Client::enrol(wider, &[1, 2, 3, 4], &mut OsRng).unwrap();
    server.enrol(enrolment);

    let (message, signature) = client.authenticate(&[1, 2, 3, 4], &mut OsRng).unwrap();
    let rejection = server.authenticate(&message, &signature).unwrap_err();
    assert_eq!(rejection.reason(), RejectReason::DecryptionFailed);
}

#[test]
fn requests_are_answered_through_frames() {
    let timings = Arc::new(Timings::new());
    let server = Server::with_observer(parameters(), timings.clone()).unwrap();
    let (client, enrolment) = Client::enrol(parameters(), &[0, 0, 0], &mut OsRng).unwrap();

    let frame = messages::encode(&Request::Enrol(enrolment)).unwrap();
    assert_eq!(server.handle_frame(&frame), Response::Enrolled);

    let (message, signature) = client.authenticate(&[3, 4, 0], &mut OsRng).unwrap();
    let frame = messages::encode(&Request::Authenticate { message, signature }).unwrap();
    assert_eq!(server.handle_frame(&frame), Response::Distance(25));
    assert_eq!(timings.count(Phase::ServerAuthentication), 1);

    assert_eq!(
        server.handle_frame(&[0xff, 0xff, 0xff]),
        Response::Rejected(RejectReason::Malformed)
    );
    assert!(matches!(
        server.enrol_bytes(&[1, 2, 3]),
        Err(Rejection::Malformed(_))
    ));
}

#[test]
fn oversized_point_count_is_malformed() {
    let server = Server::new(parameters()).unwrap();
    let (client, enrolment) = Client::enrol(parameters(), &[1, 2, 3], &mut OsRng).unwrap();
    server.enrol(enrolment);
    let (message, _) = client.authenticate(&[1, 2, 3], &mut OsRng).unwrap();

    // Authenticate variant, identifier, then the first ciphertext point
    // (a length byte and a compressed G2 element)
    let mut head = messages::encode(&(1u32, &message.rid)).unwrap();
    let ciphertext = messages::encode(&message.ciphertext).unwrap();
    head.extend_from_slice(&ciphertext[..1 + 96]);

    // 2^36 points announced, none sent
    let mut frame = head.clone();
    frame.extend(messages::encode(&(1u64 << 36)).unwrap());
    assert_eq!(
        server.handle_frame(&frame),
        Response::Rejected(RejectReason::Malformed)
    );

    // 2^36 as the raw little endian count of an arkworks vector
    let mut frame = head;
    frame.extend(messages::encode(&(1u64 << 36).to_le_bytes().to_vec()).unwrap());
    assert_eq!(
        server.handle_frame(&frame),
        Response::Rejected(RejectReason::Malformed)
    );
}

#[test]
fn re_enrolment_racing_authentication() {
    let server = Server::new(parameters()).unwrap();
    let (alice, enrol_alice) = Client::enrol(parameters(), &[0, 0, 0], &mut OsRng).unwrap();
    let (_, mut enrol_bob) = Client::enrol(parameters(), &[5, 5, 5], &mut OsRng).unwrap();
    // Bob's keys under Alice's identifier
    enrol_bob.rid = alice.rid().clone();
    server.enrol(enrol_alice.clone());

    let (message, signature) = alice.authenticate(&[3, 4, 0], &mut OsRng).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| {
            for round in 0..40 {
                if round % 2 == 0 {
                    server.enrol(enrol_bob.clone());
                } else {
                    server.enrol(enrol_alice.clone());
                }
            }
        });
        for _ in 0..3 {
            s.spawn(|| {
                for _ in 0..10 {
                    // Alice's whole record or Bob's whole record, never a mix:
                    // a mix would verify and then fail to decrypt
                    match server.authenticate(&message, &signature) {
                        Ok(distance) => assert_eq!(distance.value(), 25),
                        Err(rejection) => {
                            assert_eq!(rejection.reason(), RejectReason::InvalidSignature)
                        }
                    }
                }
            });
        }
    });

    // Last round enrolled Alice again
    assert_eq!(server.database().len(), 1);
    assert_eq!(server.authenticate(&message, &signature).unwrap().value(), 25);
}
