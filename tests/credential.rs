use ps_locreds::credential::client::Client;
use ps_locreds::credential::context::CredentialContext;
use ps_locreds::credential::keys::generate_key;
use ps_locreds::credential::server::Server;
use ps_locreds::credential::signature;
use ps_locreds::error::CredentialError;
use blstrs::Scalar;
use ff::Field;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn ps_signature_keygen_sign_verify() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let ctx = CredentialContext::new();
    let (sk, pk) = generate_key(&ctx, 3, &mut rng);

    let msgs: Vec<Scalar> = (0..3).map(|_| Scalar::random(&mut rng)).collect();
    let sig = signature::sign(&ctx.g(), &sk, &msgs).unwrap();
    assert!(signature::verify(&pk, &sig, &msgs));

    let mut tampered = msgs.clone();
    tampered[0] = Scalar::random(&mut rng);
    assert!(!signature::verify(&pk, &sig, &tampered));
}

#[test]
fn full_registration_and_selective_disclosure() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let server = Server::new();
    let subscriptions = vec!["gold".to_string(), "news".to_string()];
    let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

    let mut client = Client::new("alice", &mut rng);
    let request_bytes = client
        .prepare_registration(&pk_bundle_bytes, &["gold".to_string()], &mut rng)
        .unwrap();
    let response_bytes = server
        .process_registration(&sk_bytes, &pk_bundle_bytes, &request_bytes, "alice", &mut rng)
        .unwrap();
    let credential_bytes = client
        .process_registration_response(&pk_bundle_bytes, &response_bytes)
        .unwrap();

    let proof_bytes = client
        .sign_request(&pk_bundle_bytes, &credential_bytes, b"GET /gold-content", &["gold".to_string()], &mut rng)
        .unwrap();
    let accepted = server
        .check_request_signature(&pk_bundle_bytes, b"GET /gold-content", &["gold".to_string()], &proof_bytes)
        .unwrap();
    assert!(accepted);

    let rejected = server
        .check_request_signature(&pk_bundle_bytes, b"GET /gold-content", &["news".to_string()], &proof_bytes)
        .unwrap();
    assert!(!rejected);
}

#[test]
fn duplicate_username_registration_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let server = Server::new();
    let subscriptions = vec!["gold".to_string()];
    let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

    let mut first = Client::new("bob", &mut rng);
    let req1 = first
        .prepare_registration(&pk_bundle_bytes, &["gold".to_string()], &mut rng)
        .unwrap();
    server
        .process_registration(&sk_bytes, &pk_bundle_bytes, &req1, "bob", &mut rng)
        .unwrap();

    let mut second = Client::new("bob", &mut rng);
    let req2 = second
        .prepare_registration(&pk_bundle_bytes, &["gold".to_string()], &mut rng)
        .unwrap();
    let err = server
        .process_registration(&sk_bytes, &pk_bundle_bytes, &req2, "bob", &mut rng)
        .unwrap_err();
    assert!(matches!(err, CredentialError::PolicyViolation(_)));
}

#[test]
fn credential_never_discloses_password() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let server = Server::new();
    let subscriptions = vec!["gold".to_string()];
    let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

    let mut client = Client::new("carol", &mut rng);
    let req = client
        .prepare_registration(&pk_bundle_bytes, &["gold".to_string()], &mut rng)
        .unwrap();
    let resp = server
        .process_registration(&sk_bytes, &pk_bundle_bytes, &req, "carol", &mut rng)
        .unwrap();
    let cred_bytes = client.process_registration_response(&pk_bundle_bytes, &resp).unwrap();

    let err = client
        .sign_request(&pk_bundle_bytes, &cred_bytes, b"m", &["password".to_string()], &mut rng)
        .unwrap_err();
    assert!(matches!(err, CredentialError::PolicyViolation(_)));
}
