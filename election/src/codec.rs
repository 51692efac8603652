//! Vote payload codec.
//!
//! A vote is the chosen answer index as a 4-byte big-endian unsigned
//! integer. Bytes past the fourth are ignored on decode.

use chanvote_types::AnswerIndex;

use crate::election::Election;
use crate::error::{DecodeError, ElectionError, VoteRejection};

pub const VOTE_PAYLOAD_LEN: usize = 4;

pub fn encode_vote(index: AnswerIndex) -> [u8; VOTE_PAYLOAD_LEN] {
    index.to_be_bytes()
}

pub fn decode_vote(payload: &[u8]) -> Result<AnswerIndex, DecodeError> {
    let bytes: [u8; VOTE_PAYLOAD_LEN] = payload
        .get(..VOTE_PAYLOAD_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(DecodeError(payload.len()))?;
    Ok(AnswerIndex::from_be_bytes(bytes))
}

impl Election {
    /// Encode a vote for one of this election's answers.
    pub fn encode_vote(&self, index: AnswerIndex) -> Result<[u8; VOTE_PAYLOAD_LEN], ElectionError> {
        let answers = self.answers().len();
        if index as usize >= answers {
            return Err(ElectionError::EncodeRange { index, answers });
        }
        Ok(encode_vote(index))
    }

    /// Decode an inbound payload and check it names one of the answers.
    pub fn decode_vote(&self, payload: &[u8]) -> Result<AnswerIndex, VoteRejection> {
        let index = decode_vote(payload)?;
        let answers = self.answers().len();
        if index as usize >= answers {
            return Err(VoteRejection::OutOfRange { index, answers });
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanvote_nullables::test_address;
    use chanvote_types::Address;

    fn election() -> Election {
        Election::from_trusted(
            "Lunch?",
            vec!["Pizza".into(), "Sushi".into(), "Tacos".into()],
            ["alice", "bob", "carol"].iter().map(|n| test_address(n)).collect(),
            None,
            Address::new("BM-87Zd56bxno4k3mNjvQukRr5sQh7T9sqDrsd"),
        )
        .unwrap()
    }

    #[test]
    fn encoding_is_big_endian() {
        assert_eq!(encode_vote(1), [0, 0, 0, 1]);
        assert_eq!(encode_vote(0x0102_0304), [1, 2, 3, 4]);
    }

    #[test]
    fn short_payload_is_malformed() {
        assert_eq!(decode_vote(&[0, 0, 1]), Err(DecodeError(3)));
        assert_eq!(decode_vote(&[]), Err(DecodeError(0)));
    }

    #[test]
    fn trailing_bytes_ignored() {
        assert_eq!(decode_vote(&[0, 0, 0, 2, 0xff, 0xff]), Ok(2));
    }

    #[test]
    fn election_encode_checks_range() {
        let e = election();
        assert_eq!(e.encode_vote(2).unwrap(), [0, 0, 0, 2]);
        assert!(matches!(
            e.encode_vote(3),
            Err(ElectionError::EncodeRange { index: 3, answers: 3 })
        ));
    }

    #[test]
    fn election_decode_checks_range() {
        let e = election();
        assert_eq!(e.decode_vote(&[0, 0, 0, 0]), Ok(0));
        assert_eq!(
            e.decode_vote(&[0, 0, 0, 7]),
            Err(VoteRejection::OutOfRange { index: 7, answers: 3 })
        );
        assert_eq!(
            e.decode_vote(&[9]),
            Err(VoteRejection::Malformed(DecodeError(1)))
        );
    }
}
