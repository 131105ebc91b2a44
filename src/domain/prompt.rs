use crate::domain::operation::Tone;

const GRAMMAR_TEMPLATE: &str = "Eres un experto corrector de gramática y ortografía en español. \n\
Corrige el siguiente texto manteniendo el mismo significado y tono. \n\
Devuelve solo el texto corregido sin explicaciones adicionales.\n\
\n\
Texto: {text}";

const STYLE_TEMPLATE: &str = "Eres un experto editor de textos en español. \n\
Reescribe el siguiente texto manteniendo el contenido pero cambiando el estilo. \n\
Instrucción de tono: {instructions}\n\
Devuelve solo el texto reescrito sin explicaciones.\n\
\n\
Texto: {text}";

const CONTENT_TEMPLATE: &str = "Eres un escritor talentoso en español. \n\
Crea contenido original, bien estructurado y atractivo basado en el siguiente tema:\n\
\n\
Tema: {topic}\n\
\n\
Devuelve el contenido generado.";

const TONE_INSTRUCTIONS: [(Tone, &str); 3] = [
    (
        Tone::Formal,
        "Usa un lenguaje profesional y cortés. Mantén estructuras de oraciones complejas.",
    ),
    (
        Tone::Creative,
        "Usa un lenguaje imaginativo y expresivo. Incluye metáforas y descripción vivida.",
    ),
    (
        Tone::Casual,
        "Usa un lenguaje relajado y conversacional. Como si hablaras con un amigo.",
    ),
];

pub fn tone_instruction(tone: Tone) -> &'static str {
    TONE_INSTRUCTIONS
        .iter()
        .find(|(candidate, _)| *candidate == tone)
        .map(|(_, instruction)| *instruction)
        .unwrap_or(TONE_INSTRUCTIONS[0].1)
}

pub fn grammar_prompt(text: &str) -> String {
    GRAMMAR_TEMPLATE.replace("{text}", text)
}

pub fn style_prompt(text: &str, tone: Tone) -> String {
    // Instructions first so user text containing "{instructions}" stays untouched.
    STYLE_TEMPLATE
        .replace("{instructions}", tone_instruction(tone))
        .replacen("{text}", text, 1)
}

pub fn content_prompt(topic: &str) -> String {
    CONTENT_TEMPLATE.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_prompt_ends_with_text() {
        let prompt = grammar_prompt("hola mundo");
        assert!(prompt.starts_with("Eres un experto corrector"));
        assert!(prompt.ends_with("Texto: hola mundo"));
    }

    #[test]
    fn style_prompt_embeds_tone_instruction() {
        let prompt = style_prompt("el sol brilla", Tone::Casual);
        assert!(prompt.contains("Instrucción de tono: Usa un lenguaje relajado"));
        assert!(prompt.ends_with("Texto: el sol brilla"));
    }

    #[test]
    fn every_tone_has_its_own_instruction() {
        let formal = tone_instruction(Tone::Formal);
        let creative = tone_instruction(Tone::Creative);
        let casual = tone_instruction(Tone::Casual);
        assert!(formal.contains("profesional"));
        assert!(creative.contains("metáforas"));
        assert!(casual.contains("amigo"));
    }

    #[test]
    fn content_prompt_places_topic() {
        let prompt = content_prompt("tema X");
        assert!(prompt.contains("Tema: tema X\n"));
        assert!(prompt.ends_with("Devuelve el contenido generado."));
    }

    #[test]
    fn user_text_is_inserted_verbatim() {
        let prompt = style_prompt("usa {instructions} aquí", Tone::Formal);
        assert!(prompt.ends_with("Texto: usa {instructions} aquí"));
    }
}
