use criterion::{criterion_group, criterion_main, Criterion};
use ps_locreds::credential::client::Client;
use ps_locreds::credential::context::CredentialContext;
use ps_locreds::credential::keys::generate_key;
use ps_locreds::credential::server::Server;
use ps_locreds::credential::showing;
use ps_locreds::credential::signature;
use rand::thread_rng;

fn bench_sign_and_verify(c: &mut Criterion) {
    let mut rng = thread_rng();
    let ctx = CredentialContext::new();
    let (sk, pk) = generate_key(&ctx, 5, &mut rng);
    let msgs: Vec<blstrs::Scalar> = (0..5).map(|_| <blstrs::Scalar as ff::Field>::random(&mut rng)).collect();

    c.bench_function("credential/sign", |b| {
        b.iter(|| signature::sign(&ctx.g(), &sk, &msgs).unwrap())
    });

    let sig = signature::sign(&ctx.g(), &sk, &msgs).unwrap();
    c.bench_function("credential/verify", |b| {
        b.iter(|| signature::verify(&pk, &sig, &msgs))
    });
}

fn bench_registration(c: &mut Criterion) {
    let mut rng = thread_rng();
    let server = Server::new();
    let subscriptions: Vec<String> = (0..4).map(|i| format!("sub-{i}")).collect();
    let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

    c.bench_function("credential/prepare_registration", |b| {
        b.iter(|| {
            let mut client = Client::new("bench-user", &mut rng);
            client
                .prepare_registration(&pk_bundle_bytes, &subscriptions, &mut rng)
                .unwrap()
        })
    });

    c.bench_function("credential/end_to_end_registration", |b| {
        b.iter(|| {
            let mut client = Client::new("bench-user", &mut rng);
            let req = client
                .prepare_registration(&pk_bundle_bytes, &subscriptions, &mut rng)
                .unwrap();
            let resp = server
                .process_registration(&sk_bytes, &pk_bundle_bytes, &req, "bench-user", &mut rng)
                .unwrap();
            client.process_registration_response(&pk_bundle_bytes, &resp).unwrap()
        })
    });
}

fn bench_showing(c: &mut Criterion) {
    let mut rng = thread_rng();
    let server = Server::new();
    let subscriptions: Vec<String> = (0..4).map(|i| format!("sub-{i}")).collect();
    let (sk_bytes, pk_bundle_bytes) = server.generate_ca(&subscriptions, &mut rng).unwrap();

    let mut client = Client::new("bench-user", &mut rng);
    let req = client
        .prepare_registration(&pk_bundle_bytes, &subscriptions, &mut rng)
        .unwrap();
    let resp = server
        .process_registration(&sk_bytes, &pk_bundle_bytes, &req, "bench-user", &mut rng)
        .unwrap();
    let cred_bytes = client.process_registration_response(&pk_bundle_bytes, &resp).unwrap();

    c.bench_function("credential/sign_request", |b| {
        b.iter(|| {
            client
                .sign_request(&pk_bundle_bytes, &cred_bytes, b"GET /sub-0", &["sub-0".to_string()], &mut rng)
                .unwrap()
        })
    });

    let proof_bytes = client
        .sign_request(&pk_bundle_bytes, &cred_bytes, b"GET /sub-0", &["sub-0".to_string()], &mut rng)
        .unwrap();
    c.bench_function("credential/check_request_signature", |b| {
        b.iter(|| {
            showing::verify(
                &CredentialContext::new(),
                &ps_locreds::credential::wire::decode::<ps_locreds::credential::wire::PublicKeyBundle>(&pk_bundle_bytes)
                    .unwrap()
                    .pk,
                &ps_locreds::credential::wire::decode(&proof_bytes).unwrap(),
                b"GET /sub-0",
            )
        })
    });
}

criterion_group!(benches, bench_sign_and_verify, bench_registration, bench_showing);
criterion_main!(benches);
