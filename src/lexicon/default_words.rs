/// Installed when the configured word list cannot be loaded, so the engine
/// still has something to play with
pub(super) const DEFAULT_WORDS: &[&str] = &[
    "aa", "ab", "ad", "ae", "ag", "ah", "ai", "al", "am", "an", "ar", "as", "at", "aw", "ax", "ay",
    "ba", "be", "bi", "bo", "by", "da", "de", "do", "ed", "ef", "eh", "el", "em", "en", "er", "es",
    "ex", "fa", "go", "ha", "he", "hi", "hm", "ho", "id", "if", "in", "is", "it", "jo", "ka", "la",
    "li", "lo", "ma", "me", "mi", "mo", "mu", "my", "na", "ne", "no", "nu", "od", "oe", "of", "oh",
    "oi", "om", "on", "op", "or", "os", "ow", "ox", "oy", "pa", "pe", "pi", "qi", "re", "sh", "si",
    "so", "ta", "ti", "to", "uh", "um", "un", "up", "us", "ut", "we", "wo", "xi", "xu", "ya", "ye",
    "yo", "za",
    "act", "add", "age", "ago", "aid", "aim", "air", "all", "and", "ant", "any", "ape", "arc", "are",
    "arm", "art", "ash", "ask", "ate", "bad", "bag", "bar", "bat", "bed", "bee", "bet", "big", "bit",
    "box", "boy", "bud", "bug", "bus", "but", "buy", "cab", "can", "cap", "car", "cat", "cow", "cry",
    "cup", "cut", "day", "den", "dig", "dog", "dot", "dry", "due", "ear", "eat", "egg", "end", "era",
    "eve", "eye", "fan", "far", "fat", "few", "fig", "fit", "fix", "fly", "fog", "for", "fox", "fun",
    "fur", "gap", "gas", "get", "gum", "gun", "hat", "hen", "her", "hit", "hot", "how", "ice", "ink",
    "jam", "jar", "jaw", "jet", "job", "joy", "key", "kid", "lab", "lap", "law", "leg", "let", "lid",
    "lie", "lip", "log", "lot", "low", "man", "map", "mat", "mix", "mud", "net", "new", "not", "now",
    "nut", "oak", "oar", "odd", "oil", "old", "one", "our", "out", "owl", "own", "pan", "pen", "pet",
    "pie", "pig", "pin", "pit", "pot", "put", "quiz", "rat", "raw", "red", "rib", "rid", "rod", "rot",
    "row", "rub", "run", "sad", "sat", "saw", "say", "sea", "see", "set", "sit", "six", "sky", "son",
    "sun", "tab", "tan", "tap", "tar", "tax", "tea", "ten", "the", "tie", "tin", "tip", "toe", "top",
    "toy", "try", "tub", "two", "use", "van", "vet", "war", "wax", "way", "web", "wet", "who", "why",
    "win", "wit", "yes", "yet", "zap", "zoo",
    "able", "back", "ball", "band", "bank", "bear", "beat", "bird", "blue", "boat", "bone", "book",
    "cake", "call", "card", "care", "cart", "cats", "coat", "cold", "crab", "dark", "door", "down",
    "east", "easy", "face", "fact", "fire", "fish", "game", "gate", "gift", "gold", "hand", "hard",
    "home", "idea", "jazz", "jump", "king", "lake", "land", "line", "lion", "love", "make", "milk",
    "name", "nest", "note", "open", "page", "rain", "read", "road", "rock", "rose", "sail", "salt",
    "sand", "scab", "seal", "star", "stone", "table", "tiles", "time", "tree", "word", "zero",
    "babble", "cable", "crabs", "earth", "great", "house", "light", "water", "words", "scrabble",
];
