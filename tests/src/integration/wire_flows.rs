//! # Wire Protocol Flows
//!
//! Two `WireProtocolService` instances standing in for two peers, with the
//! transport reduced to passing `RawMessage` values between them.
//!
//! ## Flows Tested:
//!
//! 1. **Negotiation**: newest common version wins, older peer limits the catalogue
//! 2. **Handshake**: Status first, mismatches are fatal, no second Status
//! 3. **Correlation**: out-of-order responses matched by request id
//! 4. **Bodies**: structured and pre-encoded responses are interchangeable
//! 5. **Limits**: oversized and malformed blobs never reach handlers

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use qc_wire_protocol::{
        BlockBodiesPacket, BlockBodiesRlpPacket, BlockBody, BlockHeadersPacket,
        GetBlockBodiesPacket, GetBlockHeadersPacket, HashOrNumber, Message, MessageKind,
        NewBlockPacket, OriginError, ProtocolSession, ProtocolVersion, RawList, RawMessage,
        Versioned, WireConfig, WireError, WireProtocolApi, WireProtocolService, MAX_MESSAGE_SIZE,
    };
    use shared_types::{Block, Hash, Location};

    use crate::fixtures::{
        header, init_tracing, peer_status, random_body, random_hash, random_transaction,
        ChecksumFilter, StaticChain,
    };

    type Peer = WireProtocolService<StaticChain, ChecksumFilter>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn peer(config: WireConfig) -> Peer {
        let chain = StaticChain::default();
        let filter = ChecksumFilter(chain.fork_id.hash);
        WireProtocolService::new(config, Arc::new(chain), Arc::new(filter))
    }

    fn peer_with_versions(versions: Vec<ProtocolVersion>) -> Peer {
        peer(WireConfig {
            supported_versions: versions,
            ..Default::default()
        })
    }

    fn advertised(peer: &Peer) -> Vec<u32> {
        peer.config()
            .supported_versions
            .iter()
            .map(|v| v.number())
            .collect()
    }

    /// Negotiate and exchange Status in both directions.
    fn connect(a: &Peer, b: &Peer) -> (ProtocolSession, ProtocolSession) {
        let mut a_session = a.open_session(&advertised(b)).unwrap();
        let mut b_session = b.open_session(&advertised(a)).unwrap();
        let version = a_session.version().unwrap();
        assert_eq!(b_session.version(), Some(version));

        let a_status = a
            .encode_message(version, &Message::Status(a.local_status(version)))
            .unwrap();
        let b_status = b
            .encode_message(version, &Message::Status(b.local_status(version)))
            .unwrap();
        b.handle_inbound(&mut b_session, &a_status).unwrap();
        a.handle_inbound(&mut a_session, &b_status).unwrap();

        (a_session, b_session)
    }

    // =============================================================================
    // FLOW 1: NEGOTIATION
    // =============================================================================

    #[test]
    fn test_older_peer_limits_catalogue() {
        init_tracing();
        let a = peer_with_versions(vec![ProtocolVersion::Eth66, ProtocolVersion::Eth65]);
        let b = peer_with_versions(vec![ProtocolVersion::Eth65]);

        let (a_session, b_session) = connect(&a, &b);
        assert_eq!(a_session.version(), Some(ProtocolVersion::Eth65));
        assert!(a_session.is_active() && b_session.is_active());

        let admitted = (0u64..=0xff)
            .filter(|code| *code != 0x00 && a_session.check_inbound(*code).is_ok())
            .count();
        // Status is consumed by the handshake; 0x0c is unassigned.
        assert_eq!(admitted, 17);

        let rollup = Message::GetOnePendingEtxsRollup(Versioned::new(
            ProtocolVersion::Eth65,
            0,
            Default::default(),
        ));
        assert!(matches!(
            a.encode_message(ProtocolVersion::Eth65, &rollup),
            Err(WireError::InvalidMessageCode { code: 0x14, .. })
        ));
    }

    #[test]
    fn test_newest_common_version_preferred() {
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (a_session, _) = connect(&a, &b);
        assert_eq!(a_session.version(), Some(ProtocolVersion::Eth66));
        assert_eq!(
            a_session.check_inbound(0x13),
            Ok(MessageKind::PendingEtxsRollup)
        );
    }

    // =============================================================================
    // FLOW 2: HANDSHAKE
    // =============================================================================

    #[test]
    fn test_request_before_status_is_fatal() {
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let mut b_session = b.open_session(&advertised(&a)).unwrap();

        let request = Message::GetBlockBodies(Versioned::new(
            ProtocolVersion::Eth66,
            1,
            GetBlockBodiesPacket(vec![Hash::repeat_byte(9)]),
        ));
        let raw = a.encode_message(ProtocolVersion::Eth66, &request).unwrap();

        let err = b.handle_inbound(&mut b_session, &raw).unwrap_err();
        assert_eq!(err, WireError::NoStatusMsg);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_network_mismatch_is_fatal() {
        let a = peer(WireConfig {
            network_id: 2,
            ..Default::default()
        });
        let b = peer(WireConfig::default());
        let mut b_session = b.open_session(&advertised(&a)).unwrap();

        let status = peer_status(&StaticChain::default(), 66, 2);
        let raw = a
            .encode_message(ProtocolVersion::Eth66, &Message::Status(status))
            .unwrap();

        let err = b.handle_inbound(&mut b_session, &raw).unwrap_err();
        assert_eq!(err, WireError::NetworkIdMismatch { ours: 1, theirs: 2 });
        assert!(err.is_fatal());
        assert!(!b_session.is_active());
    }

    #[test]
    fn test_second_status_rejected() {
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (_, mut b_session) = connect(&a, &b);

        let again = a
            .encode_message(
                ProtocolVersion::Eth66,
                &Message::Status(a.local_status(ProtocolVersion::Eth66)),
            )
            .unwrap();
        assert_eq!(
            b.handle_inbound(&mut b_session, &again),
            Err(WireError::ExtraStatusMsg)
        );
    }

    // =============================================================================
    // FLOW 3: REQUEST/RESPONSE CORRELATION
    // =============================================================================

    #[test]
    fn test_out_of_order_responses_matched_by_id() {
        let mut rng = StdRng::seed_from_u64(66);
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (mut a_session, mut b_session) = connect(&a, &b);
        let version = ProtocolVersion::Eth66;

        // A sends two concurrent body requests.
        let mut outstanding: HashMap<u64, Vec<Hash>> = HashMap::new();
        let mut requests = Vec::new();
        for id in [101u64, 102] {
            let hashes: Vec<Hash> = (0..3).map(|_| random_hash(&mut rng)).collect();
            outstanding.insert(id, hashes.clone());
            let request =
                Message::GetBlockBodies(Versioned::new(version, id, GetBlockBodiesPacket(hashes)));
            requests.push(a.encode_message(version, &request).unwrap());
        }

        // B answers in reverse order, echoing each id.
        let mut responses = Vec::new();
        for raw in requests.iter().rev() {
            let request = b.handle_inbound(&mut b_session, raw).unwrap();
            let id = request.request_id().unwrap();
            let name = request.name();
            let Message::GetBlockBodies(get) = request else {
                panic!("expected GetBlockBodies, got {name}");
            };
            let bodies = get
                .packet()
                .0
                .iter()
                .map(|_| random_body(&mut rng, 1, 0, 0))
                .collect();
            let response =
                Message::BlockBodies(Versioned::new(version, id, BlockBodiesPacket(bodies)));
            responses.push(b.encode_message(version, &response).unwrap());
        }

        // A demultiplexes by id.
        for raw in &responses {
            let response = a.handle_inbound(&mut a_session, raw).unwrap();
            let id = response.request_id().unwrap();
            let requested = outstanding.remove(&id).unwrap();
            let Message::BlockBodies(bodies) = response else {
                panic!("expected BlockBodies");
            };
            assert_eq!(bodies.packet().len(), requested.len());
        }
        assert!(outstanding.is_empty());
    }

    #[test]
    fn test_header_queries_on_both_versions() {
        for version in ProtocolVersion::SUPPORTED {
            let a = peer_with_versions(vec![version]);
            let b = peer_with_versions(vec![version]);
            let (_, mut b_session) = connect(&a, &b);

            for origin in [
                HashOrNumber::Number(1024),
                HashOrNumber::Hash(Hash::repeat_byte(0x42)),
            ] {
                let query = Message::GetBlockHeaders(Versioned::new(
                    version,
                    7,
                    GetBlockHeadersPacket {
                        origin,
                        amount: 192,
                        dom: true,
                        reverse: false,
                        to: 0,
                        skip: 0,
                    },
                ));
                let raw = a.encode_message(version, &query).unwrap();
                let decoded = b.handle_inbound(&mut b_session, &raw).unwrap();
                assert_eq!(decoded, query);
                assert_eq!(decoded.request_id().is_some(), version.uses_request_ids());
            }
        }
    }

    #[test]
    fn test_header_query_answered_with_headers() {
        let location = Location::new(&[0, 2]);
        for version in ProtocolVersion::SUPPORTED {
            let a = peer_with_versions(vec![version]);
            let b = peer_with_versions(vec![version]);
            let (mut a_session, mut b_session) = connect(&a, &b);

            let query = Message::GetBlockHeaders(Versioned::new(
                version,
                31,
                GetBlockHeadersPacket {
                    origin: HashOrNumber::Number(100),
                    amount: 3,
                    ..Default::default()
                },
            ));
            let raw = a.encode_message(version, &query).unwrap();
            let request = b.handle_inbound(&mut b_session, &raw).unwrap();
            assert_eq!(raw, b.encode_message(version, &request).unwrap());

            let headers: Vec<_> = (100..103).map(|n| header(n, &location)).collect();
            let response = Message::BlockHeaders(Versioned::new(
                version,
                31,
                BlockHeadersPacket(headers.clone()),
            ));
            let raw = b.encode_message(version, &response).unwrap();
            let received = a.handle_inbound(&mut a_session, &raw).unwrap();
            assert_eq!(received, response);
            assert_eq!(raw, a.encode_message(version, &received).unwrap());

            let Message::BlockHeaders(received) = received else {
                panic!("expected BlockHeaders");
            };
            assert_eq!(received.into_packet().0, headers);
        }
    }

    #[test]
    fn test_block_with_uncles_propagates() {
        let mut rng = StdRng::seed_from_u64(7);
        let location = Location::new(&[1, 0]);
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (_, mut b_session) = connect(&a, &b);
        let version = b_session.version().unwrap();

        let announcement = Message::NewBlock(NewBlockPacket {
            block: Block {
                header: header(12, &location),
                transactions: (0..2).map(|_| random_transaction(&mut rng, 64)).collect(),
                uncles: vec![header(10, &location), header(11, &location)],
                ext_transactions: vec![random_transaction(&mut rng, 16)],
                sub_manifest: vec![random_hash(&mut rng)].into(),
            },
        });
        let raw = a.encode_message(version, &announcement).unwrap();
        let received = b.handle_inbound(&mut b_session, &raw).unwrap();

        assert_eq!(received, announcement);
        assert_eq!(raw, b.encode_message(version, &received).unwrap());
    }

    // =============================================================================
    // FLOW 4: BODIES
    // =============================================================================

    #[test]
    fn test_body_roundtrip_byte_identical() {
        let mut rng = StdRng::seed_from_u64(9);
        let body = random_body(&mut rng, 2, 1, 0);
        let encoded = rlp::encode(&body);

        let decoded: BlockBody = rlp::decode(&encoded).unwrap();
        assert_eq!(decoded.transactions.len(), 2);
        assert!(decoded.uncles.is_empty());
        assert_eq!(decoded.ext_transactions.len(), 1);
        assert!(decoded.sub_manifest.is_empty());
        assert_eq!(rlp::encode(&decoded), encoded);
    }

    #[test]
    fn test_stored_bodies_served_without_reencoding() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (mut a_session, _) = connect(&a, &b);
        let version = ProtocolVersion::Eth66;

        let bodies: Vec<BlockBody> = (0..4).map(|i| random_body(&mut rng, i, 1, i)).collect();
        let mut stored = RawList::<BlockBody>::new();
        for body in &bodies {
            stored.push_raw(rlp::encode(body).to_vec()).unwrap();
        }

        let raw_response =
            Message::BlockBodiesRlp(Versioned::new(version, 5, BlockBodiesRlpPacket(stored)));
        let structured =
            Message::BlockBodies(Versioned::new(version, 5, BlockBodiesPacket(bodies.clone())));
        let from_raw = b.encode_message(version, &raw_response).unwrap();
        assert_eq!(from_raw, b.encode_message(version, &structured).unwrap());

        let received = a.handle_inbound(&mut a_session, &from_raw).unwrap();
        assert_eq!(received, structured);
        let Message::BlockBodies(response) = received else {
            panic!("expected BlockBodies");
        };
        let (txs, uncles, etxs, manifests) = response.into_packet().unpack();
        assert_eq!(txs.iter().map(Vec::len).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(uncles.len(), 4);
        assert!(etxs.iter().all(|e| e.len() == 1));
        assert_eq!(manifests[3].len(), 3);
    }

    // =============================================================================
    // FLOW 5: LIMITS AND MALFORMED INPUT
    // =============================================================================

    #[test]
    fn test_oversized_rejected_before_decode() {
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (_, mut b_session) = connect(&a, &b);

        // Garbage bytes: any decode attempt would fail differently.
        let mut raw = RawMessage::new(0, vec![0xff; MAX_MESSAGE_SIZE + 1]);
        for kind in MessageKind::ALL.into_iter().filter(|k| *k != MessageKind::Status) {
            raw.code = u64::from(kind.code());
            assert_eq!(
                b.handle_inbound(&mut b_session, &raw),
                Err(WireError::MessageTooLarge {
                    size: MAX_MESSAGE_SIZE + 1,
                    max: MAX_MESSAGE_SIZE,
                }),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_invalid_origin_size_surfaces() {
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (_, mut b_session) = connect(&a, &b);

        let mut s = rlp::RlpStream::new_list(2);
        s.append(&1u64);
        s.begin_list(6);
        s.append(&vec![0xaau8; 16]);
        for _ in 0..5 {
            s.append(&0u64);
        }
        let raw = RawMessage::new(0x03, s.out().to_vec());

        let err = b.handle_inbound(&mut b_session, &raw).unwrap_err();
        assert_eq!(err, WireError::Origin(OriginError::InvalidSize(16)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_bare_request_rejected_on_eth66() {
        let old = peer_with_versions(vec![ProtocolVersion::Eth65]);
        let a = peer(WireConfig::default());
        let b = peer(WireConfig::default());
        let (_, mut b_session) = connect(&a, &b);

        // A confused peer sends the eth/65 layout on an eth/66 connection.
        let hashes = (1..=3).map(Hash::repeat_byte).collect();
        let bare = Message::GetBlockBodies(Versioned::new(
            ProtocolVersion::Eth65,
            0,
            GetBlockBodiesPacket(hashes),
        ));
        let raw = old.encode_message(ProtocolVersion::Eth65, &bare).unwrap();
        assert!(matches!(
            b.handle_inbound(&mut b_session, &raw),
            Err(WireError::Decode {
                kind: MessageKind::GetBlockBodies,
                ..
            })
        ));
    }
}
